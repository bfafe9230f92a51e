//! MySQL schema introspection implementation

use async_trait::async_trait;
use tablewright_core::{
    ColumnInfo, Connection, DatabaseInfo, ForeignKeyAction, ForeignKeyInfo, IndexInfo, Result,
    Row, SchemaIntrospection, TableInfo, TableStatusInfo, TableType,
};

use crate::MySqlConnection;

/// Quote a string as a MySQL literal for catalogue lookups
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

fn owned_str(row: &Row, index: usize) -> Option<String> {
    row.get_str(index).map(|s| s.to_string())
}

fn non_empty(row: &Row, index: usize) -> Option<String> {
    owned_str(row, index).filter(|s| !s.is_empty())
}

/// Bring a MariaDB `COLUMN_DEFAULT` to the MySQL form: `NULL` means no
/// default and string literals arrive quoted.
fn normalize_mariadb_default(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    if raw == "NULL" {
        return None;
    }
    match raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => Some(unescape_literal(inner)),
        None => Some(raw),
    }
}

fn unescape_literal(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    out
}

#[async_trait]
impl SchemaIntrospection for MySqlConnection {
    #[tracing::instrument(skip(self))]
    async fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        let result = self.query("SHOW DATABASES").await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| owned_str(row, 0).map(|name| DatabaseInfo { name }))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn list_tables(&self, database: &str) -> Result<Vec<TableInfo>> {
        let query = format!(
            "SELECT TABLE_NAME, TABLE_TYPE, ENGINE, TABLE_ROWS, TABLE_COMMENT
             FROM information_schema.TABLES
             WHERE TABLE_SCHEMA = {}
             ORDER BY TABLE_NAME",
            literal(database)
        );
        let result = self.query(&query).await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| {
                Some(TableInfo {
                    name: owned_str(row, 0)?,
                    table_type: TableType::from_mysql(row.get_str(1).unwrap_or("BASE TABLE")),
                    engine: non_empty(row, 2),
                    row_count: row.get(3).and_then(|v| v.as_u64()),
                    comment: non_empty(row, 4),
                })
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_table_status(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Option<TableStatusInfo>> {
        let query = format!(
            "SELECT t.TABLE_NAME, t.ENGINE, c.CHARACTER_SET_NAME, t.TABLE_COLLATION,
                    t.TABLE_COMMENT, t.ROW_FORMAT, t.AUTO_INCREMENT
             FROM information_schema.TABLES t
             LEFT JOIN information_schema.COLLATIONS c
               ON c.COLLATION_NAME = t.TABLE_COLLATION
             WHERE t.TABLE_SCHEMA = {} AND t.TABLE_NAME = {}",
            literal(database),
            literal(table)
        );
        let result = self.query(&query).await?;

        Ok(result.rows.first().map(|row| TableStatusInfo {
            name: owned_str(row, 0).unwrap_or_else(|| table.to_string()),
            engine: non_empty(row, 1),
            charset: non_empty(row, 2),
            collation: non_empty(row, 3),
            comment: non_empty(row, 4),
            row_format: non_empty(row, 5),
            auto_increment: row.get(6).and_then(|v| v.as_u64()),
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn get_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        let query = format!(
            "SELECT
                COLUMN_NAME,
                ORDINAL_POSITION,
                COLUMN_TYPE,
                IS_NULLABLE,
                COLUMN_DEFAULT,
                COLUMN_KEY,
                EXTRA,
                COLUMN_COMMENT,
                CHARACTER_SET_NAME,
                COLLATION_NAME,
                GENERATION_EXPRESSION
             FROM information_schema.COLUMNS
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}
             ORDER BY ORDINAL_POSITION",
            literal(database),
            literal(table)
        );
        let result = self.query(&query).await?;
        let mariadb = self.is_mariadb();

        Ok(result
            .rows
            .iter()
            .map(|row| ColumnInfo {
                name: owned_str(row, 0).unwrap_or_default(),
                ordinal: row.get(1).and_then(|v| v.as_u64()).unwrap_or(0) as usize,
                column_type: owned_str(row, 2).unwrap_or_default(),
                nullable: row.get_str(3).unwrap_or("NO") == "YES",
                default_value: if mariadb {
                    normalize_mariadb_default(owned_str(row, 4))
                } else {
                    owned_str(row, 4)
                },
                column_key: owned_str(row, 5).unwrap_or_default(),
                extra: owned_str(row, 6).unwrap_or_default(),
                comment: owned_str(row, 7).unwrap_or_default(),
                character_set: non_empty(row, 8),
                collation: non_empty(row, 9),
                generation_expression: non_empty(row, 10),
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_indexes(&self, database: &str, table: &str) -> Result<Vec<IndexInfo>> {
        let query = format!(
            "SELECT INDEX_NAME, COLUMN_NAME, SEQ_IN_INDEX, NON_UNIQUE, INDEX_TYPE, INDEX_COMMENT
             FROM information_schema.STATISTICS
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}
             ORDER BY INDEX_NAME = 'PRIMARY' DESC, INDEX_NAME, SEQ_IN_INDEX",
            literal(database),
            literal(table)
        );
        let result = self.query(&query).await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| {
                Some(IndexInfo {
                    key_name: owned_str(row, 0)?,
                    // Functional key parts report a NULL column name
                    column_name: owned_str(row, 1)?,
                    seq_in_index: row.get(2).and_then(|v| v.as_u64()).unwrap_or(1) as u32,
                    non_unique: row.get(3).and_then(|v| v.as_i64()).unwrap_or(1) != 0,
                    index_type: owned_str(row, 4).unwrap_or_else(|| "BTREE".to_string()),
                    comment: owned_str(row, 5).unwrap_or_default(),
                })
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_foreign_keys(&self, database: &str, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let query = format!(
            "SELECT
                k.CONSTRAINT_NAME,
                k.COLUMN_NAME,
                k.REFERENCED_TABLE_NAME,
                k.REFERENCED_COLUMN_NAME,
                r.UPDATE_RULE,
                r.DELETE_RULE
             FROM information_schema.KEY_COLUMN_USAGE k
             JOIN information_schema.REFERENTIAL_CONSTRAINTS r
               ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
              AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME
              AND r.TABLE_NAME = k.TABLE_NAME
             WHERE k.TABLE_SCHEMA = {} AND k.TABLE_NAME = {}
               AND k.REFERENCED_TABLE_NAME IS NOT NULL
             ORDER BY k.CONSTRAINT_NAME, k.ORDINAL_POSITION",
            literal(database),
            literal(table)
        );
        let result = self.query(&query).await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| {
                Some(ForeignKeyInfo {
                    name: owned_str(row, 0)?,
                    column: owned_str(row, 1).unwrap_or_default(),
                    referenced_table: owned_str(row, 2).unwrap_or_default(),
                    referenced_column: owned_str(row, 3).unwrap_or_default(),
                    on_update: ForeignKeyAction::from_sql(row.get_str(4).unwrap_or("RESTRICT")),
                    on_delete: ForeignKeyAction::from_sql(row.get_str(5).unwrap_or("RESTRICT")),
                })
            })
            .collect())
    }
}
