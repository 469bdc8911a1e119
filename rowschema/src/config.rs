//! This module contains schema limits configuration.

use std::collections::HashMap;
use std::str::FromStr;

use derive_builder::Builder;

use crate::error::Result;
use crate::RowSchema;
use crate::{Error, ErrorKind};

/// Property key of [`SchemaConfig::max_num_columns`].
pub const MAX_NUM_COLUMNS_KEY: &str = "rowschema.max_num_columns";
/// Property key of [`SchemaConfig::max_row_size`].
pub const MAX_ROW_SIZE_KEY: &str = "rowschema.max_row_size";

/// Limits a schema must stay within to be admitted.
///
/// The limits are not checked by [`RowSchema::reset`], callers that admit
/// user defined schemas run [`SchemaConfig::check`] on the built schema.
#[derive(PartialEq, Eq, Debug, Clone, Builder)]
#[builder(setter(prefix = "with"), default)]
pub struct SchemaConfig {
    /// Maximum number of columns in a schema.
    pub max_num_columns: usize,
    /// Maximum width in bytes of a row.
    pub max_row_size: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_num_columns: 300,
            max_row_size: 1024 * 1024,
        }
    }
}

fn parse_property<T>(props: &HashMap<String, String>, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    props
        .get(key)
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| {
            Error::new(ErrorKind::ConfigInvalid, format!("Can't parse {key}."))
                .with_context("key", key)
                .set_source(e)
        })
}

impl TryFrom<&'_ HashMap<String, String>> for SchemaConfig {
    type Error = Error;

    fn try_from(value: &'_ HashMap<String, String>) -> Result<Self> {
        let mut builder = SchemaConfigBuilder::default();

        if let Some(v) = parse_property(value, MAX_NUM_COLUMNS_KEY)? {
            builder.with_max_num_columns(v);
        }
        if let Some(v) = parse_property(value, MAX_ROW_SIZE_KEY)? {
            builder.with_max_row_size(v);
        }

        builder.build().map_err(|e| {
            Error::new(ErrorKind::ConfigInvalid, "Can't build schema config.").set_source(e)
        })
    }
}

impl SchemaConfig {
    /// Check that `schema` stays within the limits.
    pub fn check(&self, schema: &RowSchema) -> Result<()> {
        if schema.num_columns() > self.max_num_columns {
            log::warn!(
                "Schema has {} columns, more than the limit {}",
                schema.num_columns(),
                self.max_num_columns
            );
            return Err(Error::new(
                ErrorKind::SchemaLimitExceeded,
                format!(
                    "Too many columns: {} > {}",
                    schema.num_columns(),
                    self.max_num_columns
                ),
            ));
        }

        if schema.byte_size() > self.max_row_size {
            log::warn!(
                "Schema rows are {} bytes, more than the limit {}",
                schema.byte_size(),
                self.max_row_size
            );
            return Err(Error::new(
                ErrorKind::SchemaLimitExceeded,
                format!(
                    "Row too wide: {} bytes > {} bytes",
                    schema.byte_size(),
                    self.max_row_size
                ),
            ));
        }

        Ok(())
    }
}
