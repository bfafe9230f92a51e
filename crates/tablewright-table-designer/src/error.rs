//! Error types for the table designer

use thiserror::Error;
use tablewright_core::CoreError;

use crate::models::ValidationError;

pub type DesignerResult<T> = Result<T, DesignerError>;

/// Failures surfaced by the designer, loader and editor
#[derive(Debug, Error)]
pub enum DesignerError {
    /// Rejected before any statement reached the database
    #[error("{}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    /// The server rejected a synthesized statement; message is verbatim
    #[error("{0}")]
    Database(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Table `{database}`.`{table}` not found")]
    SchemaNotFound { database: String, table: String },

    #[error("Schema introspection not supported for this connection")]
    IntrospectionNotSupported,

    #[error("Cannot {action} while the editor is {state}")]
    InvalidState { action: &'static str, state: String },

    #[error("No {kind} at row {index}")]
    IndexOutOfRange { kind: &'static str, index: usize },
}

impl DesignerError {
    /// Shorthand for a single validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DesignerError::Validation(vec![ValidationError::new(field, message)])
    }

    /// Whether the failure happened before contacting the database
    pub fn is_validation(&self) -> bool {
        matches!(self, DesignerError::Validation(_))
    }
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<CoreError> for DesignerError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Connection(message) => DesignerError::Connection(message),
            CoreError::Query(message) => DesignerError::Database(message),
        }
    }
}
