//! End-to-end properties of the DDL synthesizer over a loaded table

mod common;

use common::shop;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tablewright_core::{Connection, ForeignKeyAction};
use tablewright_table_designer::service::definitions::build_column_def;
use tablewright_table_designer::{
    AlterStrategy, ColumnDesign, DdlKind, DefaultValue, DesignerError, DdlSynthesizer,
    IndexDesign, SnapshotLoader, TableOptions, TableSnapshot,
};

async fn loaded_users() -> TableSnapshot {
    let conn = Arc::new(shop()) as Arc<dyn Connection>;
    SnapshotLoader::new(conn)
        .load_snapshot("shop", "users")
        .await
        .expect("users should load")
}

fn alter(original: &TableSnapshot, current: &TableSnapshot) -> Result<Vec<String>, DesignerError> {
    DdlSynthesizer::new(AlterStrategy::Minimal)
        .synthesize("shop", "users", Some(original), current, false)
        .map(|statement| statement.clauses)
}

fn column_index(snapshot: &TableSnapshot, name: &str) -> usize {
    snapshot
        .columns
        .iter()
        .position(|c| c.name == name)
        .expect("column exists")
}

#[tokio::test]
async fn test_unchanged_table_is_rejected_as_no_op() {
    let original = loaded_users().await;

    let result = alter(&original, &original.clone());

    match result {
        Err(DesignerError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "changes");
            assert_eq!(errors[0].message, "No changes to save");
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_restate_strategy_rewrites_an_unchanged_table() {
    let original = loaded_users().await;

    let statement = DdlSynthesizer::new(AlterStrategy::Restate)
        .synthesize("shop", "users", Some(&original), &original, false)
        .expect("restate always has clauses");

    let modifies = statement
        .clauses
        .iter()
        .filter(|c| c.starts_with("MODIFY COLUMN"))
        .count();
    assert_eq!(modifies, 6);
    assert!(statement.clauses.contains(&"DROP PRIMARY KEY".to_string()));
    assert!(statement.clauses.contains(&"ADD PRIMARY KEY (`id`)".to_string()));
    assert!(!statement.sql.contains("FOREIGN KEY"));
}

#[tokio::test]
async fn test_rename_is_a_change_not_add_and_drop() {
    let original = loaded_users().await;
    let mut current = original.clone();
    let name = column_index(&current, "name");
    current.columns[name].name = "full_name".into();

    let clauses = alter(&original, &current).expect("rename produces DDL");

    assert_eq!(
        clauses,
        vec![
            "CHANGE COLUMN `name` `full_name` varchar(100) CHARACTER SET utf8mb4 \
             COLLATE utf8mb4_general_ci NULL DEFAULT NULL COMMENT 'display name'"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_renaming_an_indexed_column_keeps_its_index() {
    let original = loaded_users().await;
    let mut current = original.clone();
    let email = column_index(&current, "email");
    current.columns[email].name = "email_address".into();
    for idx in &mut current.indexes {
        if idx.column_name == "email" {
            idx.column_name = "email_address".into();
        }
    }

    let clauses = alter(&original, &current).expect("rename produces DDL");

    assert_eq!(clauses.len(), 1);
    assert!(clauses[0].starts_with("CHANGE COLUMN `email` `email_address` varchar(255)"));
}

#[tokio::test]
async fn test_removed_column_is_dropped_once() {
    let original = loaded_users().await;
    let mut current = original.clone();
    let surname = column_index(&current, "surname");
    current.columns.remove(surname);

    let clauses = alter(&original, &current).expect("drop produces DDL");

    assert_eq!(clauses, vec!["DROP COLUMN `surname`".to_string()]);
}

#[tokio::test]
async fn test_added_column_comes_before_drops() {
    let original = loaded_users().await;
    let mut current = original.clone();
    let surname = column_index(&current, "surname");
    current.columns.remove(surname);
    current.columns.push(
        ColumnDesign::new("nickname", "varchar(32)").default_value(DefaultValue::Literal("it's".into())),
    );

    let clauses = alter(&original, &current).expect("changes produce DDL");

    assert_eq!(
        clauses,
        vec![
            "ADD COLUMN `nickname` varchar(32) NULL DEFAULT 'it''s'".to_string(),
            "DROP COLUMN `surname`".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_changing_delete_rule_drops_and_re_adds_the_constraint() {
    let original = loaded_users().await;
    let mut current = original.clone();
    current.foreign_keys[0].on_delete = ForeignKeyAction::SetNull;

    let clauses = alter(&original, &current).expect("fk change produces DDL");

    assert_eq!(
        clauses,
        vec![
            "DROP FOREIGN KEY `fk_users_team`".to_string(),
            "ADD CONSTRAINT `fk_users_team` FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`) \
             ON UPDATE RESTRICT ON DELETE SET NULL"
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_deleted_and_vanished_foreign_keys_are_dropped() {
    let original = loaded_users().await;

    let mut marked = original.clone();
    marked.foreign_keys[0].is_deleted = true;
    let mut vanished = original.clone();
    vanished.foreign_keys.clear();

    let expected = vec!["DROP FOREIGN KEY `fk_users_team`".to_string()];
    assert_eq!(alter(&original, &marked).expect("drop"), expected);
    assert_eq!(alter(&original, &vanished).expect("drop"), expected);
}

#[tokio::test]
async fn test_loaded_defaults_render_escaped_and_unquoted() {
    let original = loaded_users().await;

    let surname = original.column("surname").expect("surname");
    assert!(build_column_def(surname).ends_with("NOT NULL DEFAULT 'O''Brien'"));

    let created_at = original.column("created_at").expect("created_at");
    assert_eq!(
        build_column_def(created_at),
        "`created_at` datetime NOT NULL DEFAULT CURRENT_TIMESTAMP"
    );
}

#[tokio::test]
async fn test_typed_current_timestamp_default_is_a_keyword() {
    let original = loaded_users().await;
    let mut current = original.clone();
    current.columns.push(
        ColumnDesign::new("updated_at", "timestamp")
            .not_null()
            .default_value(DefaultValue::from_input("CURRENT_TIMESTAMP")),
    );

    let clauses = alter(&original, &current).expect("add produces DDL");

    assert_eq!(
        clauses,
        vec!["ADD COLUMN `updated_at` timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string()]
    );
}

#[tokio::test]
async fn test_column_rendering_is_stable() {
    let original = loaded_users().await;

    for column in &original.columns {
        assert_eq!(build_column_def(column), build_column_def(column));
    }
}

#[test]
fn test_new_table_scenario() {
    let snapshot = TableSnapshot::new_default()
        .with_column(
            ColumnDesign::new("id", "int(11)")
                .primary_key()
                .auto_increment(),
        )
        .with_index(IndexDesign::primary("id"))
        .with_options(TableOptions {
            engine: Some("InnoDB".into()),
            charset: Some("utf8mb4".into()),
            collation: Some("utf8mb4_general_ci".into()),
            ..TableOptions::default()
        });

    let statement = DdlSynthesizer::default()
        .synthesize("shop", "counters", None, &snapshot, true)
        .expect("new table produces DDL");

    assert_eq!(statement.kind, DdlKind::CreateTable);
    assert!(statement.sql.starts_with("CREATE TABLE `shop`.`counters` ("));
    assert!(statement.sql.contains("`id` int(11) NOT NULL auto_increment"));
    assert!(statement.sql.contains("PRIMARY KEY (`id`)"));
    assert!(statement
        .sql
        .contains("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_general_ci"));
    assert_eq!(statement.sql.matches("CREATE TABLE").count(), 1);
}

#[test]
fn test_new_table_without_columns_is_rejected() {
    let result = DdlSynthesizer::default().synthesize(
        "shop",
        "empty",
        None,
        &TableSnapshot::new_default(),
        true,
    );

    assert!(matches!(result, Err(DesignerError::Validation(_))));
}
