//! Table Designer for tablewright
//!
//! Editable MySQL table structures and the engine that turns edits into DDL.
//!
//! ## Features
//!
//! - Snapshot models for columns, indexes, foreign keys and table options
//! - Column type parsing/composition (`decimal(10,2) unsigned zerofill`)
//! - Schema diff and `CREATE TABLE` / `ALTER TABLE` synthesis
//! - Snapshot loading from a live connection
//! - An editor state machine that owns one editing session
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablewright_table_designer::{AlterStrategy, ColumnEdit, SnapshotLoader, TableEditor};
//!
//! let loader = SnapshotLoader::new(connection.clone());
//! let mut editor = TableEditor::open(&loader, "shop", "customers", AlterStrategy::Minimal).await?;
//! editor.edit_column(1, ColumnEdit::Rename("full_name".into()))?;
//! println!("{}", editor.preview()?);
//! editor.save(connection.as_ref(), Some(&loader)).await?;
//! ```

pub mod editor;
pub mod error;
pub mod models;
pub mod service;

// Re-exports for convenience
pub use editor::{
    CloseDecision, ColumnEdit, EditorState, ForeignKeyEdit, IndexEdit, TableEditor,
};
pub use error::{DesignerError, DesignerResult};
pub use models::{
    ColumnDesign, ColumnExtra, ColumnKey, DataTypeCategory, DataTypeInfo, DefaultValue,
    ForeignKeyDesign, GeneratedColumn, IndexDesign, IndexKind, IndexMethod, TableOptions,
    TableSnapshot, TypeDescriptor, ValidationError, get_data_types, lookup_data_type,
};
pub use service::{AlterStrategy, DdlKind, DdlStatement, DdlSynthesizer, SnapshotLoader};
pub use tablewright_core::ForeignKeyAction;
