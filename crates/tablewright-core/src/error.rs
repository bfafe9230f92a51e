//! Error types for tablewright

use thiserror::Error;

/// Core error type for connection and introspection operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// The server could not be reached or the session was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected a statement; carries its message verbatim
    #[error("Query error: {0}")]
    Query(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
