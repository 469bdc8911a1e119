//! rowschema describes the physical layout of a table's rows: the ordered,
//! typed columns of a table, the byte offset of every column inside a
//! fixed-width row buffer and the lookups from column name and column id
//! to position.
//!
//! Row encoders, decoders and key comparators consult a [`RowSchema`] to
//! find where each value lives.

// Make sure all our public APIs have docs.
#![deny(missing_docs)]

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod column;
pub use column::ColumnDescriptor;

mod schema;
pub use schema::ColumnId;
pub use schema::RowSchema;
pub use schema::RowSchemaBuilder;

pub mod config;
pub mod types;
