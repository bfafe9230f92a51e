//! Models for table design
//!
//! Explicit records for one table's structure: columns, index rows, foreign
//! keys and storage options, bundled into a [`TableSnapshot`].

mod column_design;
mod data_types;
mod foreign_key_design;
mod index_design;
mod table_options;
mod table_snapshot;
mod type_descriptor;
mod validation;

pub use column_design::{ColumnDesign, ColumnExtra, ColumnKey, DefaultValue, GeneratedColumn};
pub use data_types::{DataTypeCategory, DataTypeInfo, get_data_types, lookup_data_type};
pub use foreign_key_design::ForeignKeyDesign;
pub use index_design::{IndexDesign, IndexKind, IndexMethod, PRIMARY_KEY_NAME};
pub use table_options::TableOptions;
pub use table_snapshot::TableSnapshot;
pub use type_descriptor::{TypeDescriptor, compose_type, parse_type};
pub use validation::ValidationError;
