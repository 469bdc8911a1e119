//! The row schema: ordered columns plus the physical layout derived from them.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::types::TypeInfoRef;
use crate::ColumnDescriptor;
use crate::Error;
use crate::Result;

/// Externally assigned, stable identifier of a column.
pub type ColumnId = usize;

/// Ordered, typed columns of a table and the byte layout of its rows.
///
/// The first [`RowSchema::num_key_columns`] columns form the primary key and
/// are never nullable. Every column `i` starts at byte
/// [`RowSchema::column_offset`]`(i)` of a fixed-width row buffer, and the
/// buffer is [`RowSchema::byte_size`] bytes long.
///
/// A schema is only changed by [`RowSchema::reset`], which replaces all of
/// its contents at once or leaves them untouched on failure.
#[derive(Debug, Clone)]
pub struct RowSchema {
    columns: Vec<ColumnDescriptor>,
    num_key_columns: usize,
    /// One entry per column plus the total row width.
    column_offsets: Vec<usize>,
    name_to_index: HashMap<String, usize>,
    /// Either empty or parallel to `columns`.
    column_ids: Vec<ColumnId>,
    id_to_index: HashMap<ColumnId, usize>,
}

impl Default for RowSchema {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            num_key_columns: 0,
            column_offsets: vec![0],
            name_to_index: HashMap::new(),
            column_ids: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }
}

impl RowSchema {
    /// Create a schema from `columns`, the first `key_columns` of which
    /// form the primary key. `ids` is either empty or holds one id per
    /// column.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        ids: Vec<ColumnId>,
        key_columns: usize,
    ) -> Result<Self> {
        let mut schema = Self::default();
        schema.reset(columns, ids, key_columns)?;
        Ok(schema)
    }

    /// Create a schema whose columns carry no ids.
    pub fn with_key_columns(columns: Vec<ColumnDescriptor>, key_columns: usize) -> Result<Self> {
        Self::new(columns, vec![], key_columns)
    }

    /// Replace the whole schema with `columns`, `ids` and `key_columns`.
    ///
    /// Checks, in order: key column count, id count, key nullability, name
    /// uniqueness and that the row width fits in a `usize`. The first
    /// failed check returns an
    /// [`crate::ErrorKind::InvalidSchema`] error and `self` keeps its
    /// previous contents.
    pub fn reset(
        &mut self,
        columns: Vec<ColumnDescriptor>,
        ids: Vec<ColumnId>,
        key_columns: usize,
    ) -> Result<()> {
        let staged = match Self::stage(columns, ids, key_columns) {
            Ok(staged) => staged,
            Err(e) => {
                log::debug!("Rejected row schema: {e}");
                return Err(e);
            }
        };

        *self = staged;
        log::debug!(
            "Reset row schema: {} columns, {} key columns, {} bytes per row",
            self.num_columns(),
            self.num_key_columns,
            self.byte_size()
        );
        Ok(())
    }

    /// Validate the input and derive the layout into a fresh schema.
    fn stage(
        columns: Vec<ColumnDescriptor>,
        ids: Vec<ColumnId>,
        key_columns: usize,
    ) -> Result<Self> {
        if key_columns > columns.len() {
            return Err(Error::bad_schema("More key columns than columns")
                .with_context("key_columns", key_columns.to_string())
                .with_context("columns", columns.len().to_string()));
        }

        if !ids.is_empty() && ids.len() != columns.len() {
            return Err(Error::bad_schema(
                "The number of ids does not match with the number of columns",
            )
            .with_context("ids", ids.len().to_string())
            .with_context("columns", columns.len().to_string()));
        }

        if let Some(col) = columns[..key_columns].iter().find(|c| c.is_nullable()) {
            return Err(Error::bad_schema("Nullable key columns not supported")
                .with_context("column", col.name()));
        }

        let name_to_index: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| (col.name().to_string(), i))
            .collect();

        if name_to_index.len() != columns.len() {
            return Err(Error::bad_schema("Duplicate name present in schema!"));
        }

        let mut column_offsets = Vec::with_capacity(columns.len() + 1);
        let mut offset: usize = 0;
        for col in columns.iter() {
            column_offsets.push(offset);
            offset = offset.checked_add(col.type_info().size()).ok_or_else(|| {
                Error::bad_schema("Row size overflows")
                    .with_context("column", col.name())
                    .with_context("size", col.type_info().size().to_string())
            })?;
        }
        column_offsets.push(offset);

        // Later duplicates of an id win.
        let id_to_index = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        Ok(Self {
            columns,
            num_key_columns: key_columns,
            column_offsets,
            name_to_index,
            column_ids: ids,
            id_to_index,
        })
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of leading columns that form the primary key.
    pub fn num_key_columns(&self) -> usize {
        self.num_key_columns
    }

    /// All columns, in physical order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// The column at position `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn column(&self, idx: usize) -> &ColumnDescriptor {
        &self.columns[idx]
    }

    /// The primary key columns.
    pub fn key_columns(&self) -> &[ColumnDescriptor] {
        &self.columns[..self.num_key_columns]
    }

    /// Whether the column at `idx` is part of the primary key.
    pub fn is_key_column(&self, idx: usize) -> bool {
        idx < self.num_key_columns
    }

    /// Byte offset of column `idx` in a row.
    ///
    /// `column_offset(num_columns())` is the row width.
    pub fn column_offset(&self, idx: usize) -> usize {
        self.column_offsets[idx]
    }

    /// Offsets of every column, followed by the row width.
    pub fn column_offsets(&self) -> &[usize] {
        &self.column_offsets
    }

    /// Width in bytes of a row.
    pub fn byte_size(&self) -> usize {
        self.column_offsets[self.columns.len()]
    }

    /// Width in bytes of the primary key prefix of a row.
    pub fn key_byte_size(&self) -> usize {
        self.column_offsets[self.num_key_columns]
    }

    /// Position of the column named `name`.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// The column named `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.find_column(name).map(|idx| &self.columns[idx])
    }

    /// Whether the columns carry ids.
    pub fn has_column_ids(&self) -> bool {
        !self.column_ids.is_empty()
    }

    /// Column ids, parallel to [`RowSchema::columns`]. Empty if unused.
    pub fn column_ids(&self) -> &[ColumnId] {
        &self.column_ids
    }

    /// Id of the column at `idx`.
    pub fn column_id(&self, idx: usize) -> Option<ColumnId> {
        self.column_ids.get(idx).copied()
    }

    /// Position of the column with id `id`.
    pub fn find_column_by_id(&self, id: ColumnId) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// A schema holding only the primary key columns of this one.
    pub fn create_key_projection(&self) -> RowSchema {
        let n = self.num_key_columns;
        RowSchema {
            columns: self.columns[..n].to_vec(),
            num_key_columns: n,
            column_offsets: self.column_offsets[..=n].to_vec(),
            name_to_index: self
                .name_to_index
                .iter()
                .filter(|(_, idx)| **idx < n)
                .map(|(name, idx)| (name.clone(), *idx))
                .collect(),
            column_ids: self.column_ids.iter().take(n).copied().collect(),
            id_to_index: self
                .id_to_index
                .iter()
                .filter(|(_, idx)| **idx < n)
                .map(|(id, idx)| (*id, *idx))
                .collect(),
        }
    }
}

impl PartialEq for RowSchema {
    fn eq(&self, other: &Self) -> bool {
        self.num_key_columns == other.num_key_columns && self.columns == other.columns
    }
}

impl Display for RowSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema [{}]", self.columns.iter().join(", "))
    }
}

/// Builder to create a [`RowSchema`] column by column.
///
/// Key columns always precede the other columns, whatever the order the
/// columns were added in.
#[derive(Debug, Default)]
pub struct RowSchemaBuilder {
    key_columns: Vec<(ColumnDescriptor, Option<ColumnId>)>,
    columns: Vec<(ColumnDescriptor, Option<ColumnId>)>,
}

impl RowSchemaBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primary key column.
    pub fn add_key_column(&mut self, name: impl Into<String>, ty: TypeInfoRef) -> &mut Self {
        self.key_columns
            .push((ColumnDescriptor::required(name, ty), None));
        self
    }

    /// Add a primary key column with id `id`.
    pub fn add_key_column_with_id(
        &mut self,
        id: ColumnId,
        name: impl Into<String>,
        ty: TypeInfoRef,
    ) -> &mut Self {
        self.key_columns
            .push((ColumnDescriptor::required(name, ty), Some(id)));
        self
    }

    /// Add a non-key column.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        ty: TypeInfoRef,
        nullable: bool,
    ) -> &mut Self {
        self.columns
            .push((ColumnDescriptor::new(name, ty, nullable), None));
        self
    }

    /// Add a non-key column with id `id`.
    pub fn add_column_with_id(
        &mut self,
        id: ColumnId,
        name: impl Into<String>,
        ty: TypeInfoRef,
        nullable: bool,
    ) -> &mut Self {
        self.columns
            .push((ColumnDescriptor::new(name, ty, nullable), Some(id)));
        self
    }

    /// Build the schema.
    ///
    /// Fails like [`RowSchema::reset`]. Columns added both with and
    /// without ids fail as an id count mismatch.
    pub fn build(&self) -> Result<RowSchema> {
        let num_key_columns = self.key_columns.len();
        let (columns, ids): (Vec<_>, Vec<_>) = self
            .key_columns
            .iter()
            .chain(self.columns.iter())
            .cloned()
            .unzip();
        let ids = ids.into_iter().flatten().collect();

        RowSchema::new(columns, ids, num_key_columns)
    }
}
