//! Schema introspection traits and types

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Schema introspection interface.
///
/// Every method is a read-only catalogue query. The records mirror what the
/// server reports through `information_schema`, one row per column for
/// indexes and foreign keys, so callers can group them as they see fit.
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List all databases visible to the connection
    async fn list_databases(&self) -> Result<Vec<DatabaseInfo>>;

    /// List all tables in a database
    async fn list_tables(&self, database: &str) -> Result<Vec<TableInfo>>;

    /// Get table-level storage options, or `None` when the table does not exist
    async fn get_table_status(&self, database: &str, table: &str)
    -> Result<Option<TableStatusInfo>>;

    /// Get columns for a table, ordered by ordinal position
    async fn get_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Get index rows for a table, ordered by key name and sequence
    async fn get_indexes(&self, database: &str, table: &str) -> Result<Vec<IndexInfo>>;

    /// Get foreign key rows for a table, ordered by constraint and position
    async fn get_foreign_keys(&self, database: &str, table: &str)
    -> Result<Vec<ForeignKeyInfo>>;
}

/// Database information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
}

/// Table information (basic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub table_type: TableType,
    pub engine: Option<String>,
    pub row_count: Option<u64>,
    pub comment: Option<String>,
}

/// Table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    System,
}

impl TableType {
    /// Parse the `TABLE_TYPE` column of `information_schema.TABLES`
    pub fn from_mysql(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "VIEW" => TableType::View,
            "SYSTEM VIEW" => TableType::System,
            _ => TableType::Table,
        }
    }
}

/// Table-level storage options as reported by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableStatusInfo {
    pub name: String,
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub comment: Option<String>,
    pub row_format: Option<String>,
    pub auto_increment: Option<u64>,
}

/// Column information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub ordinal: usize,
    /// Full column type as reported (e.g. `decimal(10,2) unsigned zerofill`)
    pub column_type: String,
    pub nullable: bool,
    /// `COLUMN_DEFAULT`; `None` when the server reports SQL NULL
    pub default_value: Option<String>,
    /// `COLUMN_KEY`: `PRI`, `UNI`, `MUL` or empty
    pub column_key: String,
    /// `EXTRA`, e.g. `auto_increment` or `on update CURRENT_TIMESTAMP`
    pub extra: String,
    pub comment: String,
    pub character_set: Option<String>,
    pub collation: Option<String>,
    /// Expression of a generated column
    pub generation_expression: Option<String>,
}

/// Index information, one row per indexed column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub key_name: String,
    pub column_name: String,
    pub seq_in_index: u32,
    pub non_unique: bool,
    /// `INDEX_TYPE`: `BTREE`, `HASH`, `FULLTEXT`, `SPATIAL`
    pub index_type: String,
    pub comment: String,
}

/// Foreign key information, one row per constrained column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    pub name: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub on_update: ForeignKeyAction,
    pub on_delete: ForeignKeyAction,
}

/// Foreign key referential action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForeignKeyAction {
    #[default]
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

impl ForeignKeyAction {
    /// All actions in the order pickers present them
    pub const ALL: [ForeignKeyAction; 5] = [
        ForeignKeyAction::Restrict,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
        ForeignKeyAction::NoAction,
        ForeignKeyAction::SetDefault,
    ];

    /// Parse an `UPDATE_RULE` / `DELETE_RULE` value
    pub fn from_sql(action: &str) -> Self {
        match action.trim().to_uppercase().as_str() {
            "CASCADE" => ForeignKeyAction::Cascade,
            "SET NULL" => ForeignKeyAction::SetNull,
            "SET DEFAULT" => ForeignKeyAction::SetDefault,
            "NO ACTION" => ForeignKeyAction::NoAction,
            _ => ForeignKeyAction::Restrict,
        }
    }

    /// SQL keyword(s) for this action
    pub fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::NoAction => "NO ACTION",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
        }
    }
}

impl std::fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}
