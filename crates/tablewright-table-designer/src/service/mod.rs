//! Service layer for table designer
//!
//! DDL synthesis, the definition renderers it is built on, and snapshot loading.

mod ddl_synthesizer;
pub mod definitions;
mod snapshot_loader;

pub use ddl_synthesizer::{AlterStrategy, DdlKind, DdlStatement, DdlSynthesizer};
pub use snapshot_loader::SnapshotLoader;
