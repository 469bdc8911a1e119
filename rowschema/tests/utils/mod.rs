use std::sync::{Arc, Once};

use rowschema::types::{get_type_info, DataType, TypeInfo, TypeInfoRef};
use rowschema::ColumnDescriptor;

static INIT: Once = Once::new();

pub fn set_up() {
    INIT.call_once(env_logger::init);
}

/// A caller supplied type, registered outside the built-in registry.
#[derive(Debug)]
pub struct FixedType {
    pub name: &'static str,
    pub size: usize,
}

impl TypeInfo for FixedType {
    fn size(&self) -> usize {
        self.size
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub fn fixed_type(name: &'static str, size: usize) -> TypeInfoRef {
    Arc::new(FixedType { name, size })
}

pub fn column(name: &str, data_type: DataType, nullable: bool) -> ColumnDescriptor {
    ColumnDescriptor::new(name, get_type_info(data_type), nullable)
}
