pub mod registry;
pub mod tables;
pub mod types;

pub use registry::{Country, SchemaRegistry};
pub use tables::{resolve, BUILTIN};
pub use types::{FieldKind, FieldSpec, FieldValue, TableSchema};
