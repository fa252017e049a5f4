pub mod exception_mapping;

pub use exception_mapping::{ExceptionMapping, ExceptionMappingTable, ExceptionMappings, MappingError};
