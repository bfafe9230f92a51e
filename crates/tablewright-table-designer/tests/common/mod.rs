//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tablewright_core::{
    ColumnInfo, Connection, CoreError, DatabaseInfo, ForeignKeyAction, ForeignKeyInfo, IndexInfo,
    QueryResult, Result, SchemaIntrospection, StatementResult, TableInfo, TableStatusInfo,
    TableType,
};

/// Catalogue records for one table
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    pub status: TableStatusInfo,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

type TableKey = (String, String);

/// Mock connection for exercising the designer without a real database.
///
/// Serves canned catalogue records, logs every executed statement and can be
/// told to reject statements or fail introspection.
pub struct MockConnection {
    pub tables: Arc<parking_lot::Mutex<HashMap<TableKey, MockTable>>>,
    /// Error message returned by `execute`, as the server would word it
    pub execute_error: Option<String>,
    /// Fail every catalogue query with a connection error
    pub introspection_fails: bool,
    pub supports_introspection: bool,
    /// Table contents swapped in after a successful `execute`
    pub after_execute: Option<(TableKey, MockTable)>,
    /// Log of all executed statements, for assertion in tests
    pub execute_log: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(parking_lot::Mutex::new(HashMap::new())),
            execute_error: None,
            introspection_fails: false,
            supports_introspection: true,
            after_execute: None,
            execute_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_table(self, database: &str, table: &str, contents: MockTable) -> Self {
        self.tables
            .lock()
            .insert((database.to_string(), table.to_string()), contents);
        self
    }

    pub fn with_execute_error(mut self, message: impl Into<String>) -> Self {
        self.execute_error = Some(message.into());
        self
    }

    pub fn with_introspection_failure(mut self) -> Self {
        self.introspection_fails = true;
        self
    }

    pub fn without_introspection(mut self) -> Self {
        self.supports_introspection = false;
        self
    }

    pub fn with_table_after_execute(mut self, database: &str, table: &str, contents: MockTable) -> Self {
        self.after_execute = Some(((database.to_string(), table.to_string()), contents));
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.execute_log.lock().clone()
    }

    fn table(&self, database: &str, table: &str) -> Result<Option<MockTable>> {
        if self.introspection_fails {
            return Err(CoreError::Connection("Lost connection to MySQL server".into()));
        }
        Ok(self
            .tables
            .lock()
            .get(&(database.to_string(), table.to_string()))
            .cloned())
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.execute_log.lock().push(sql.to_string());

        if let Some(message) = &self.execute_error {
            return Err(CoreError::Query(message.clone()));
        }
        if let Some((key, contents)) = &self.after_execute {
            self.tables.lock().insert(key.clone(), contents.clone());
        }
        Ok(StatementResult { affected_rows: 0 })
    }

    async fn query(&self, _sql: &str) -> Result<QueryResult> {
        Ok(QueryResult::empty())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        if self.supports_introspection {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl SchemaIntrospection for MockConnection {
    async fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        if self.introspection_fails {
            return Err(CoreError::Connection("Lost connection to MySQL server".into()));
        }
        let mut names: Vec<String> = self.tables.lock().keys().map(|(db, _)| db.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names.into_iter().map(|name| DatabaseInfo { name }).collect())
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<TableInfo>> {
        if self.introspection_fails {
            return Err(CoreError::Connection("Lost connection to MySQL server".into()));
        }
        let mut tables: Vec<TableInfo> = self
            .tables
            .lock()
            .iter()
            .filter(|((db, _), _)| db == database)
            .map(|((_, name), contents)| TableInfo {
                name: name.clone(),
                table_type: TableType::Table,
                engine: contents.status.engine.clone(),
                row_count: Some(0),
                comment: contents.status.comment.clone(),
            })
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    async fn get_table_status(&self, database: &str, table: &str) -> Result<Option<TableStatusInfo>> {
        Ok(self.table(database, table)?.map(|t| t.status))
    }

    async fn get_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        Ok(self.table(database, table)?.map(|t| t.columns).unwrap_or_default())
    }

    async fn get_indexes(&self, database: &str, table: &str) -> Result<Vec<IndexInfo>> {
        Ok(self.table(database, table)?.map(|t| t.indexes).unwrap_or_default())
    }

    async fn get_foreign_keys(&self, database: &str, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        Ok(self
            .table(database, table)?
            .map(|t| t.foreign_keys)
            .unwrap_or_default())
    }
}

pub fn column(ordinal: usize, name: &str, column_type: &str, nullable: bool) -> ColumnInfo {
    let textual = column_type.starts_with("varchar") || column_type.starts_with("text");
    ColumnInfo {
        name: name.to_string(),
        ordinal,
        column_type: column_type.to_string(),
        nullable,
        character_set: textual.then(|| "utf8mb4".to_string()),
        collation: textual.then(|| "utf8mb4_general_ci".to_string()),
        ..ColumnInfo::default()
    }
}

pub fn index(key_name: &str, column_name: &str, seq: u32, non_unique: bool) -> IndexInfo {
    IndexInfo {
        key_name: key_name.to_string(),
        column_name: column_name.to_string(),
        seq_in_index: seq,
        non_unique,
        index_type: "BTREE".to_string(),
        comment: String::new(),
    }
}

/// `shop.users` as the catalogue reports it
pub fn users_table() -> MockTable {
    MockTable {
        status: TableStatusInfo {
            name: "users".into(),
            engine: Some("InnoDB".into()),
            charset: Some("utf8mb4".into()),
            collation: Some("utf8mb4_general_ci".into()),
            comment: None,
            row_format: Some("Dynamic".into()),
            auto_increment: Some(42),
        },
        columns: vec![
            ColumnInfo {
                column_key: "PRI".into(),
                extra: "auto_increment".into(),
                ..column(1, "id", "int(11)", false)
            },
            ColumnInfo {
                column_key: "UNI".into(),
                ..column(2, "email", "varchar(255)", false)
            },
            ColumnInfo {
                comment: "display name".into(),
                ..column(3, "name", "varchar(100)", true)
            },
            ColumnInfo {
                default_value: Some("CURRENT_TIMESTAMP".into()),
                extra: "DEFAULT_GENERATED".into(),
                ..column(4, "created_at", "datetime", false)
            },
            ColumnInfo {
                column_key: "MUL".into(),
                ..column(5, "team_id", "int(10) unsigned", true)
            },
            ColumnInfo {
                default_value: Some("O'Brien".into()),
                ..column(6, "surname", "varchar(64)", false)
            },
        ],
        indexes: vec![
            index("PRIMARY", "id", 1, false),
            index("uq_email", "email", 1, false),
            index("fk_users_team", "team_id", 1, true),
        ],
        foreign_keys: vec![ForeignKeyInfo {
            name: "fk_users_team".into(),
            column: "team_id".into(),
            referenced_table: "teams".into(),
            referenced_column: "id".into(),
            on_update: ForeignKeyAction::Restrict,
            on_delete: ForeignKeyAction::Cascade,
        }],
    }
}

/// `shop.teams`, the target of the users foreign key
pub fn teams_table() -> MockTable {
    MockTable {
        status: TableStatusInfo {
            name: "teams".into(),
            engine: Some("InnoDB".into()),
            ..TableStatusInfo::default()
        },
        columns: vec![
            ColumnInfo {
                column_key: "PRI".into(),
                ..column(1, "id", "int(10) unsigned", false)
            },
            column(2, "title", "varchar(80)", false),
        ],
        indexes: vec![index("PRIMARY", "id", 1, false)],
        foreign_keys: Vec::new(),
    }
}

/// A mock holding `shop.users` and `shop.teams`
pub fn shop() -> MockConnection {
    MockConnection::new()
        .with_table("shop", "users", users_table())
        .with_table("shop", "teams", teams_table())
}
