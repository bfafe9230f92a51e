//! Column, index, foreign key and table option renderers
//!
//! Pure functions: the same design always renders to the same string, which
//! is what lets the synthesizer compare an edited definition with the loaded
//! one.

use crate::models::{
    ColumnDesign, DefaultValue, ForeignKeyDesign, IndexDesign, IndexKind, TableOptions,
};

/// Quote an identifier with backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a string literal (`'` doubled, backslash doubled)
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// `db`.`table`, or just `table` when no database is given
pub fn qualified_table(database: &str, table: &str) -> String {
    if database.is_empty() {
        quote_ident(table)
    } else {
        format!("{}.{}", quote_ident(database), quote_ident(table))
    }
}

fn current_timestamp(precision: Option<u8>) -> String {
    match precision {
        Some(p) => format!("CURRENT_TIMESTAMP({})", p),
        None => "CURRENT_TIMESTAMP".to_string(),
    }
}

/// The `DEFAULT ...` part of a column definition, if any
pub fn render_default(col: &ColumnDesign) -> Option<String> {
    if col.extra.generated.is_some() {
        return None;
    }
    match &col.default {
        DefaultValue::None if col.nullable => Some("DEFAULT NULL".to_string()),
        DefaultValue::None => None,
        DefaultValue::Null => Some("DEFAULT NULL".to_string()),
        DefaultValue::CurrentTimestamp { precision } => {
            Some(format!("DEFAULT {}", current_timestamp(*precision)))
        }
        DefaultValue::Expression(expr) => Some(format!("DEFAULT ({})", expr)),
        DefaultValue::Literal(value) => Some(format!("DEFAULT {}", quote_literal(value))),
    }
}

/// Render one column definition
pub fn build_column_def(col: &ColumnDesign) -> String {
    let mut parts = vec![quote_ident(&col.name), col.data_type.sql_type()];

    if col.data_type.unsigned {
        parts.push("UNSIGNED".to_string());
    }
    if col.data_type.zerofill {
        parts.push("ZEROFILL".to_string());
    }
    if let Some(charset) = col.charset.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("CHARACTER SET {}", charset));
    }
    if let Some(collation) = col.collation.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("COLLATE {}", collation));
    }
    if let Some(generated) = &col.extra.generated {
        parts.push(format!(
            "GENERATED ALWAYS AS ({}) {}",
            generated.expression,
            if generated.stored { "STORED" } else { "VIRTUAL" }
        ));
    }

    parts.push(if col.nullable { "NULL" } else { "NOT NULL" }.to_string());

    if let Some(default) = render_default(col) {
        parts.push(default);
    }
    if col.extra.auto_increment {
        parts.push("auto_increment".to_string());
    }
    if col.extra.on_update_current_timestamp {
        parts.push(format!(
            "on update {}",
            current_timestamp(col.extra.on_update_precision)
        ));
    }
    if col.extra.invisible {
        parts.push("INVISIBLE".to_string());
    }
    if !col.comment.is_empty() {
        parts.push(format!("COMMENT {}", quote_literal(&col.comment)));
    }

    parts.join(" ")
}

/// Render one index from its rows, which all share `key_name`
pub fn build_index_def(key_name: &str, rows: &[&IndexDesign]) -> String {
    let columns = rows
        .iter()
        .map(|row| quote_ident(&row.column_name))
        .collect::<Vec<_>>()
        .join(",");
    let kind = rows.first().map(|row| row.kind).unwrap_or_default();

    let mut def = match kind {
        IndexKind::Primary => format!("PRIMARY KEY ({})", columns),
        IndexKind::Unique => format!("UNIQUE KEY {} ({})", quote_ident(key_name), columns),
        IndexKind::Fulltext => format!("FULLTEXT KEY {} ({})", quote_ident(key_name), columns),
        IndexKind::Spatial => format!("SPATIAL KEY {} ({})", quote_ident(key_name), columns),
        IndexKind::Normal => {
            let method = rows.first().map(|row| row.method).unwrap_or_default();
            format!(
                "KEY {} ({}) USING {}",
                quote_ident(key_name),
                columns,
                method.as_sql()
            )
        }
    };

    if let Some(comment) = rows.iter().map(|row| row.comment.as_str()).find(|c| !c.is_empty()) {
        def.push_str(&format!(" COMMENT {}", quote_literal(comment)));
    }
    def
}

fn ident_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render one foreign key constraint
pub fn build_fk_def(fk: &ForeignKeyDesign) -> String {
    format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON UPDATE {} ON DELETE {}",
        quote_ident(&fk.name),
        ident_list(&fk.columns),
        quote_ident(&fk.referenced_table),
        ident_list(&fk.referenced_columns),
        fk.on_update.as_sql(),
        fk.on_delete.as_sql()
    )
}

/// Render every option that is set, in clause order
pub fn table_option_parts(options: &TableOptions) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(engine) = options.engine.as_deref().filter(|v| !v.is_empty()) {
        parts.push(format!("ENGINE={}", engine));
    }
    if let Some(charset) = options.charset.as_deref().filter(|v| !v.is_empty()) {
        parts.push(format!("DEFAULT CHARSET={}", charset));
    }
    if let Some(collation) = options.collation.as_deref().filter(|v| !v.is_empty()) {
        parts.push(format!("COLLATE={}", collation));
    }
    if let Some(comment) = options.comment.as_deref().filter(|v| !v.is_empty()) {
        parts.push(format!("COMMENT={}", quote_literal(comment)));
    }
    if let Some(auto_increment) = options.auto_increment {
        parts.push(format!("AUTO_INCREMENT={}", auto_increment));
    }
    if let Some(row_format) = options.row_format.as_deref().filter(|v| !v.is_empty()) {
        parts.push(format!("ROW_FORMAT={}", row_format));
    }
    parts
}

/// Render only the options whose value changed between `original` and `current`.
///
/// A cleared comment renders `COMMENT=''`; other cleared options are left as they are.
pub fn changed_option_parts(original: &TableOptions, current: &TableOptions) -> Vec<String> {
    let mut changed = TableOptions::default();
    if current.engine != original.engine {
        changed.engine = current.engine.clone();
    }
    if current.charset != original.charset {
        changed.charset = current.charset.clone();
    }
    if current.collation != original.collation {
        changed.collation = current.collation.clone();
    }
    if current.auto_increment != original.auto_increment {
        changed.auto_increment = current.auto_increment;
    }
    if current.row_format != original.row_format {
        changed.row_format = current.row_format.clone();
    }

    let mut parts = table_option_parts(&changed);
    // Comment is rendered here so that clearing it still produces a clause
    if current.comment != original.comment {
        let comment = quote_literal(current.comment.as_deref().unwrap_or_default());
        // COMMENT sits after COLLATE in clause order
        let position = parts
            .iter()
            .position(|p| p.starts_with("AUTO_INCREMENT=") || p.starts_with("ROW_FORMAT="))
            .unwrap_or(parts.len());
        parts.insert(position, format!("COMMENT={}", comment));
    }
    parts
}
