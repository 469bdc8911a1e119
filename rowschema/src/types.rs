//! Physical types a column can be stored as.
//!
//! A [`RowSchema`](crate::RowSchema) only needs two things from a type: how
//! many bytes its cell occupies in a row buffer and a name to display. Both
//! are exposed through [`TypeInfo`]. The built-in types live in a process
//! wide registry and are handed out as shared [`TypeInfoRef`]s, so every
//! column of the same type points at the same descriptor.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// Reference to a shared, immutable [`TypeInfo`].
pub type TypeInfoRef = Arc<dyn TypeInfo>;

/// Storage information of a physical type.
pub trait TypeInfo: Debug + Send + Sync {
    /// Number of bytes a cell of this type occupies in a row.
    fn size(&self) -> usize;
    /// Display name of this type.
    fn name(&self) -> &str;
}

/// Built-in physical types.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DataType {
    /// 8-bit unsigned integer
    UInt8,
    /// 8-bit signed integer
    Int8,
    /// 16-bit unsigned integer
    UInt16,
    /// 16-bit signed integer
    Int16,
    /// 32-bit unsigned integer
    UInt32,
    /// 32-bit signed integer
    Int32,
    /// 64-bit unsigned integer
    UInt64,
    /// 64-bit signed integer
    Int64,
    /// 32-bit IEEE 754 floating point
    Float,
    /// 64-bit IEEE 754 floating point
    Double,
    /// True or False, stored in one byte
    Bool,
    /// UTF-8 character sequence.
    ///
    /// The row stores a slice handle (pointer and length), the bytes
    /// themselves live in an arena next to the row.
    String,
    /// Arbitrary-length byte array, stored like [`DataType::String`].
    Binary,
}

/// Size of the slice handle used for variable-length cells.
const SLICE_SIZE: usize = 16;

impl DataType {
    /// All built-in types.
    pub const ALL: [DataType; 13] = [
        DataType::UInt8,
        DataType::Int8,
        DataType::UInt16,
        DataType::Int16,
        DataType::UInt32,
        DataType::Int32,
        DataType::UInt64,
        DataType::Int64,
        DataType::Float,
        DataType::Double,
        DataType::Bool,
        DataType::String,
        DataType::Binary,
    ];

    /// Name of this type, as shown in schema strings.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::UInt8 => "uint8",
            DataType::Int8 => "int8",
            DataType::UInt16 => "uint16",
            DataType::Int16 => "int16",
            DataType::UInt32 => "uint32",
            DataType::Int32 => "int32",
            DataType::UInt64 => "uint64",
            DataType::Int64 => "int64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Bool => "bool",
            DataType::String => "string",
            DataType::Binary => "binary",
        }
    }

    /// Number of bytes a cell of this type occupies in a row.
    pub fn size(&self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 | DataType::Bool => 1,
            DataType::UInt16 | DataType::Int16 => 2,
            DataType::UInt32 | DataType::Int32 | DataType::Float => 4,
            DataType::UInt64 | DataType::Int64 | DataType::Double => 8,
            DataType::String | DataType::Binary => SLICE_SIZE,
        }
    }

    /// Whether cells of this type point at out-of-row data.
    pub fn is_variable_length(&self) -> bool {
        matches!(self, DataType::String | DataType::Binary)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DataType::ALL
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| {
                Error::new(ErrorKind::Unexpected, format!("Unknown data type: {s:?}"))
            })
    }
}

/// Descriptor of a built-in type, as stored in the registry.
#[derive(Debug)]
struct PhysicalType {
    data_type: DataType,
}

impl TypeInfo for PhysicalType {
    fn size(&self) -> usize {
        self.data_type.size()
    }

    fn name(&self) -> &str {
        self.data_type.name()
    }
}

static REGISTRY: Lazy<HashMap<DataType, TypeInfoRef>> = Lazy::new(|| {
    DataType::ALL
        .iter()
        .map(|&data_type| {
            let info: TypeInfoRef = Arc::new(PhysicalType { data_type });
            (data_type, info)
        })
        .collect()
});

/// Get the shared descriptor of a built-in type.
///
/// Every call for the same `data_type` returns the same descriptor.
pub fn get_type_info(data_type: DataType) -> TypeInfoRef {
    // The registry is built from `DataType::ALL`, so every variant is present.
    REGISTRY[&data_type].clone()
}
