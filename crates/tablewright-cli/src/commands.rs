//! Command implementations

use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;
use tablewright_core::{Connection, TableInfo, TableType};
use tablewright_table_designer::{
    AlterStrategy, ColumnDesign, ColumnKey, DefaultValue, DesignerError, IndexKind,
    SnapshotLoader, TableEditor, TableSnapshot,
};

/// Print every database visible to the connection
pub async fn list_databases(loader: &SnapshotLoader) -> Result<()> {
    for name in loader.list_databases().await? {
        println!("{}", name);
    }
    Ok(())
}

/// Print the tables of `database` as a grid
pub async fn list_tables(loader: &SnapshotLoader, database: &str) -> Result<()> {
    let tables = loader
        .describe_tables(database)
        .await
        .with_context(|| format!("Failed to list tables in '{}'", database))?;
    println!("{}", render_tables(&tables));
    Ok(())
}

/// Print a table's structure as grids, or as a JSON design file
pub async fn show(loader: &SnapshotLoader, database: &str, table: &str, json: bool) -> Result<()> {
    let snapshot = loader.load_snapshot(database, table).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&snapshot));
    }
    Ok(())
}

/// Diff a design file against the live table; execute the result when `apply` is set
pub async fn sync(
    connection: &dyn Connection,
    loader: &SnapshotLoader,
    database: &str,
    table: &str,
    design: &Path,
    apply: bool,
    strategy: AlterStrategy,
) -> Result<()> {
    let design = read_design(design)?;
    let mut editor = TableEditor::open(loader, database, table, strategy).await?;
    editor.apply_design(design)?;
    run(&mut editor, connection, loader, apply).await
}

/// Create a table from a design file
pub async fn create(
    connection: &dyn Connection,
    loader: &SnapshotLoader,
    database: &str,
    table: &str,
    design: &Path,
    apply: bool,
    strategy: AlterStrategy,
) -> Result<()> {
    let design = read_design(design)?;
    let mut editor = TableEditor::new_table(database, table, strategy);
    editor.apply_design(design)?;
    run(&mut editor, connection, loader, apply).await
}

async fn run(
    editor: &mut TableEditor,
    connection: &dyn Connection,
    loader: &SnapshotLoader,
    apply: bool,
) -> Result<()> {
    let statement = match editor.preview() {
        Ok(statement) => statement,
        Err(DesignerError::Validation(errors)) if errors.iter().all(|e| e.field == "changes") => {
            println!("-- {} is up to date", editor.table_name());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    println!("{};", statement.sql);

    if apply {
        editor
            .save(connection, Some(loader))
            .await
            .with_context(|| format!("Failed to apply changes to '{}'", editor.table_name()))?;
        println!("-- applied");
    }
    Ok(())
}

fn read_design(path: &Path) -> Result<TableSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read design file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid design file: {}", path.display()))
}

fn key_label(key: ColumnKey) -> &'static str {
    match key {
        ColumnKey::None => "",
        ColumnKey::Primary => "PRI",
        ColumnKey::Unique => "UNI",
        ColumnKey::Index => "MUL",
    }
}

fn default_label(default: &DefaultValue) -> String {
    match default {
        DefaultValue::None => String::new(),
        DefaultValue::Null => "NULL".to_string(),
        DefaultValue::CurrentTimestamp { precision: Some(p) } => format!("CURRENT_TIMESTAMP({})", p),
        DefaultValue::CurrentTimestamp { precision: None } => "CURRENT_TIMESTAMP".to_string(),
        DefaultValue::Expression(expr) => format!("({})", expr),
        DefaultValue::Literal(value) => value.clone(),
    }
}

fn extra_label(column: &ColumnDesign) -> String {
    let mut parts = Vec::new();
    if column.extra.auto_increment {
        parts.push("auto_increment".to_string());
    }
    if column.extra.on_update_current_timestamp {
        parts.push("on update CURRENT_TIMESTAMP".to_string());
    }
    if let Some(generated) = &column.extra.generated {
        let kind = if generated.stored { "STORED" } else { "VIRTUAL" };
        parts.push(format!("{} GENERATED", kind));
    }
    if column.extra.invisible {
        parts.push("INVISIBLE".to_string());
    }
    parts.join(" ")
}

fn kind_label(kind: IndexKind) -> &'static str {
    match kind {
        IndexKind::Primary => "PRIMARY",
        IndexKind::Unique => "UNIQUE",
        IndexKind::Fulltext => "FULLTEXT",
        IndexKind::Spatial => "SPATIAL",
        IndexKind::Normal => "INDEX",
    }
}

fn table_type_label(table_type: TableType) -> &'static str {
    match table_type {
        TableType::Table => "BASE TABLE",
        TableType::View => "VIEW",
        TableType::System => "SYSTEM VIEW",
    }
}

fn render_tables(tables: &[TableInfo]) -> Table {
    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL);
    grid.set_header(vec!["Name", "Type", "Engine", "Rows", "Comment"]);
    for table in tables {
        grid.add_row(vec![
            table.name.clone(),
            table_type_label(table.table_type).to_string(),
            table.engine.clone().unwrap_or_default(),
            table.row_count.map(|n| n.to_string()).unwrap_or_default(),
            table.comment.clone().unwrap_or_default(),
        ]);
    }
    grid
}

fn render_snapshot(snapshot: &TableSnapshot) -> String {
    let mut out = String::new();

    let mut columns = Table::new();
    columns.load_preset(UTF8_FULL);
    columns.set_header(vec!["Field", "Type", "Null", "Key", "Default", "Extra", "Comment"]);
    for column in &snapshot.columns {
        columns.add_row(vec![
            column.name.clone(),
            column.raw_type(),
            if column.nullable { "YES" } else { "NO" }.to_string(),
            key_label(column.key).to_string(),
            default_label(&column.default),
            extra_label(column),
            column.comment.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", columns));

    if !snapshot.indexes.is_empty() {
        let mut indexes = Table::new();
        indexes.load_preset(UTF8_FULL);
        indexes.set_header(vec!["Key", "Column", "Kind", "Method", "Comment"]);
        for index in &snapshot.indexes {
            indexes.add_row(vec![
                index.key_name.clone(),
                index.column_name.clone(),
                kind_label(index.kind).to_string(),
                index.method.as_sql().to_string(),
                index.comment.clone(),
            ]);
        }
        out.push_str(&format!("{}\n", indexes));
    }

    if !snapshot.foreign_keys.is_empty() {
        let mut fks = Table::new();
        fks.load_preset(UTF8_FULL);
        fks.set_header(vec!["Name", "Columns", "References", "On Update", "On Delete"]);
        for fk in &snapshot.foreign_keys {
            fks.add_row(vec![
                fk.name.clone(),
                fk.columns.join(", "),
                format!("{}({})", fk.referenced_table, fk.referenced_columns.join(", ")),
                fk.on_update.to_string(),
                fk.on_delete.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", fks));
    }

    let options = &snapshot.options;
    let fields = [
        ("Engine", options.engine.clone()),
        ("Charset", options.charset.clone()),
        ("Collation", options.collation.clone()),
        ("Row format", options.row_format.clone()),
        ("Auto increment", options.auto_increment.map(|v| v.to_string())),
        ("Comment", options.comment.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!("{}: {}\n", label, value));
        }
    }
    out
}
