//! Snapshot loader
//!
//! Reads a table's structure from a live connection as one snapshot, and
//! lists the objects foreign-key pickers offer.

use std::sync::Arc;

use tablewright_core::{Connection, SchemaIntrospection, TableInfo};

use crate::error::{DesignerError, DesignerResult};
use crate::models::TableSnapshot;

/// Loads table snapshots through a connection's schema introspection
#[derive(Clone)]
pub struct SnapshotLoader {
    connection: Arc<dyn Connection>,
}

impl SnapshotLoader {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    fn introspection(&self) -> DesignerResult<&dyn SchemaIntrospection> {
        self.connection
            .as_schema_introspection()
            .ok_or(DesignerError::IntrospectionNotSupported)
    }

    /// Load an existing table's structure for editing.
    ///
    /// Options, columns, indexes and foreign keys are fetched concurrently and
    /// joined; the first failure aborts the load.
    ///
    /// # Errors
    /// `SchemaNotFound` when the table does not exist, `Connection` when the
    /// server cannot be reached.
    #[tracing::instrument(skip(self))]
    pub async fn load_snapshot(&self, database: &str, table: &str) -> DesignerResult<TableSnapshot> {
        let introspection = self.introspection()?;

        let (status, columns, indexes, foreign_keys) = tokio::try_join!(
            introspection.get_table_status(database, table),
            introspection.get_columns(database, table),
            introspection.get_indexes(database, table),
            introspection.get_foreign_keys(database, table),
        )?;

        let status = status.ok_or_else(|| DesignerError::SchemaNotFound {
            database: database.to_string(),
            table: table.to_string(),
        })?;

        let snapshot = TableSnapshot::from_catalog(&status, &columns, &indexes, &foreign_keys);
        tracing::info!(
            columns = snapshot.columns.len(),
            indexes = snapshot.indexes.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            "table snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Names of the databases visible to the connection
    pub async fn list_databases(&self) -> DesignerResult<Vec<String>> {
        let databases = self.introspection()?.list_databases().await?;
        Ok(databases.into_iter().map(|db| db.name).collect())
    }

    /// Tables of a database with their type, engine, row estimate and comment
    pub async fn describe_tables(&self, database: &str) -> DesignerResult<Vec<TableInfo>> {
        Ok(self.introspection()?.list_tables(database).await?)
    }

    /// Names of the tables in a database, for choosing a referenced table
    pub async fn list_tables(&self, database: &str) -> DesignerResult<Vec<String>> {
        let tables = self.describe_tables(database).await?;
        Ok(tables.into_iter().map(|t| t.name).collect())
    }

    /// Column names of a table in ordinal order, for choosing a referenced column
    pub async fn list_columns(&self, database: &str, table: &str) -> DesignerResult<Vec<String>> {
        let mut columns = self.introspection()?.get_columns(database, table).await?;
        columns.sort_by_key(|c| c.ordinal);
        Ok(columns.into_iter().map(|c| c.name).collect())
    }
}
