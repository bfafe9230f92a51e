//! Integration tests for loading table snapshots through a connection

mod common;

use common::{MockConnection, MockTable, shop, users_table};
use std::sync::Arc;
use tablewright_core::{Connection, ForeignKeyAction, ForeignKeyInfo, TableType};
use tablewright_table_designer::{
    ColumnKey, DefaultValue, DesignerError, IndexKind, SnapshotLoader,
};

fn loader(conn: MockConnection) -> SnapshotLoader {
    SnapshotLoader::new(Arc::new(conn) as Arc<dyn Connection>)
}

#[tokio::test]
async fn test_load_snapshot_reads_every_part_of_the_table() {
    let snapshot = loader(shop())
        .load_snapshot("shop", "users")
        .await
        .expect("users should load");

    assert_eq!(
        snapshot.column_names(),
        vec!["id", "email", "name", "created_at", "team_id", "surname"]
    );
    assert!(snapshot.columns.iter().all(|c| !c.is_new));
    assert!(snapshot
        .columns
        .iter()
        .all(|c| c.original_name.as_deref() == Some(c.name.as_str())));

    let id = snapshot.column("id").expect("id column");
    assert_eq!(id.key, ColumnKey::Primary);
    assert!(id.extra.auto_increment);
    assert!(!id.nullable);

    let created_at = snapshot.column("created_at").expect("created_at column");
    assert_eq!(
        created_at.default,
        DefaultValue::CurrentTimestamp { precision: None }
    );

    let team_id = snapshot.column("team_id").expect("team_id column");
    assert!(team_id.data_type.unsigned);
    assert_eq!(team_id.data_type.length, "10");

    assert_eq!(snapshot.indexes.len(), 3);
    assert_eq!(snapshot.indexes[0].kind, IndexKind::Primary);
    assert_eq!(snapshot.indexes[1].kind, IndexKind::Unique);
    assert_eq!(snapshot.indexes[2].kind, IndexKind::Normal);

    assert_eq!(snapshot.foreign_keys.len(), 1);
    let fk = &snapshot.foreign_keys[0];
    assert_eq!(fk.columns, vec!["team_id".to_string()]);
    assert_eq!(fk.referenced_table, "teams");
    assert_eq!(fk.on_delete, ForeignKeyAction::Cascade);
    assert_eq!(fk.original_name.as_deref(), Some("fk_users_team"));

    assert_eq!(snapshot.options.engine.as_deref(), Some("InnoDB"));
    assert_eq!(snapshot.options.auto_increment, Some(42));
    assert_eq!(snapshot.options.row_format.as_deref(), Some("Dynamic"));
}

#[tokio::test]
async fn test_multi_column_foreign_key_rows_are_grouped() {
    let mut table = users_table();
    table.foreign_keys = vec![
        ForeignKeyInfo {
            name: "fk_membership".into(),
            column: "team_id".into(),
            referenced_table: "memberships".into(),
            referenced_column: "team_id".into(),
            on_update: ForeignKeyAction::Cascade,
            on_delete: ForeignKeyAction::Restrict,
        },
        ForeignKeyInfo {
            name: "fk_membership".into(),
            column: "id".into(),
            referenced_table: "memberships".into(),
            referenced_column: "user_id".into(),
            on_update: ForeignKeyAction::Cascade,
            on_delete: ForeignKeyAction::Restrict,
        },
    ];
    let conn = MockConnection::new().with_table("shop", "users", table);

    let snapshot = loader(conn)
        .load_snapshot("shop", "users")
        .await
        .expect("users should load");

    assert_eq!(snapshot.foreign_keys.len(), 1);
    let fk = &snapshot.foreign_keys[0];
    assert_eq!(fk.columns, vec!["team_id".to_string(), "id".to_string()]);
    assert_eq!(
        fk.referenced_columns,
        vec!["team_id".to_string(), "user_id".to_string()]
    );
}

#[tokio::test]
async fn test_columns_are_ordered_by_ordinal_position() {
    let mut table = users_table();
    table.columns.reverse();
    let conn = MockConnection::new().with_table("shop", "users", table);

    let snapshot = loader(conn)
        .load_snapshot("shop", "users")
        .await
        .expect("users should load");

    assert_eq!(snapshot.columns[0].name, "id");
    assert_eq!(snapshot.columns[5].name, "surname");
}

#[tokio::test]
async fn test_missing_table_is_schema_not_found() {
    let result = loader(shop()).load_snapshot("shop", "orders").await;

    match result {
        Err(DesignerError::SchemaNotFound { database, table }) => {
            assert_eq!(database, "shop");
            assert_eq!(table, "orders");
        }
        other => panic!("expected SchemaNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_connection_error() {
    let conn = shop().with_introspection_failure();

    let result = loader(conn).load_snapshot("shop", "users").await;

    assert!(matches!(result, Err(DesignerError::Connection(_))));
}

#[tokio::test]
async fn test_connection_without_introspection_is_rejected() {
    let conn = shop().without_introspection();

    let result = loader(conn).load_snapshot("shop", "users").await;

    assert!(matches!(result, Err(DesignerError::IntrospectionNotSupported)));
}

#[tokio::test]
async fn test_list_tables_and_columns_for_foreign_key_pickers() {
    let conn = shop().with_table("crm", "leads", MockTable::default());
    let loader = loader(conn);

    let databases = loader.list_databases().await.expect("databases");
    assert_eq!(databases, vec!["crm".to_string(), "shop".to_string()]);

    let tables = loader.list_tables("shop").await.expect("tables");
    assert_eq!(tables, vec!["teams".to_string(), "users".to_string()]);

    let columns = loader.list_columns("shop", "teams").await.expect("columns");
    assert_eq!(columns, vec!["id".to_string(), "title".to_string()]);
}

#[tokio::test]
async fn test_describe_tables_keeps_catalogue_details() {
    let tables = loader(shop()).describe_tables("shop").await.expect("tables");

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].name, "users");
    assert_eq!(tables[1].table_type, TableType::Table);
    assert_eq!(tables[1].engine.as_deref(), Some("InnoDB"));
    assert_eq!(tables[1].row_count, Some(0));
}

#[tokio::test]
async fn test_list_columns_of_unknown_table_is_empty() {
    let columns = loader(shop())
        .list_columns("shop", "missing")
        .await
        .expect("columns");

    assert!(columns.is_empty());
}
