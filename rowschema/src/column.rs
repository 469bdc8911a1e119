use std::fmt::{Display, Formatter};

use crate::types::TypeInfoRef;

/// A column of a row schema: its name, physical type and nullability.
///
/// Construction accepts any name and type. Uniqueness of names and
/// nullability of key columns are checked by [`crate::RowSchema`].
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    name: String,
    type_info: TypeInfoRef,
    is_nullable: bool,
}

impl ColumnDescriptor {
    /// Create a column.
    pub fn new(name: impl Into<String>, type_info: TypeInfoRef, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_info,
            is_nullable,
        }
    }

    /// Create a column that can't hold null.
    pub fn required(name: impl Into<String>, type_info: TypeInfoRef) -> Self {
        Self::new(name, type_info, false)
    }

    /// Create a nullable column.
    pub fn optional(name: impl Into<String>, type_info: TypeInfoRef) -> Self {
        Self::new(name, type_info, true)
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical type of this column.
    pub fn type_info(&self) -> &TypeInfoRef {
        &self.type_info
    }

    /// Whether the column may hold null.
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }
}

impl PartialEq for ColumnDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.is_nullable == other.is_nullable
            && self.type_info.name() == other.type_info.name()
            && self.type_info.size() == other.type_info.size()
    }
}

impl Eq for ColumnDescriptor {}

impl Display for ColumnDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[type='{}' {}]",
            self.name,
            self.type_info.name(),
            if self.is_nullable {
                "NULLABLE"
            } else {
                "NOT NULL"
            }
        )
    }
}
