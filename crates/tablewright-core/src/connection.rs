//! Connection trait

use crate::{QueryResult, Result, SchemaIntrospection, StatementResult};
use async_trait::async_trait;

/// A live database connection.
///
/// This is the execution service the table designer hands its synthesized
/// statements to. Transport, authentication and raw error propagation are the
/// implementor's concern; callers receive the server's message verbatim in the
/// returned error.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a statement that returns no rows (DDL, INSERT/UPDATE/DELETE)
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// Execute a query that returns rows (SELECT, SHOW)
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}
