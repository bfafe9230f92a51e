//! Schema diff and DDL synthesis
//!
//! Turns an original snapshot and an edited one into a single `CREATE TABLE`
//! or `ALTER TABLE` statement. Column renames are detected through each
//! column's `original_name`; nothing is matched by type or position.
//!
//! `ALTER TABLE` clauses always come in this order:
//!
//! 1. `ADD COLUMN` for new columns
//! 2. `CHANGE COLUMN` for renames, `MODIFY COLUMN` for other kept columns
//! 3. `DROP COLUMN` for columns no longer present
//! 4. index drops
//! 5. index adds
//! 6. foreign key drops
//! 7. foreign key adds
//! 8. foreign key modifications, as a drop followed by an add
//! 9. table options

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::definitions::{
    build_column_def, build_fk_def, build_index_def, changed_option_parts, qualified_table,
    quote_ident, table_option_parts,
};
use crate::error::{DesignerError, DesignerResult};
use crate::models::{
    ColumnDesign, ForeignKeyDesign, IndexDesign, PRIMARY_KEY_NAME, TableSnapshot,
};

/// How much of an existing table an `ALTER TABLE` restates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlterStrategy {
    /// Touch only columns, indexes and options whose rendered definition changed
    #[default]
    Minimal,
    /// `MODIFY` every kept column, drop and re-add every index, restate all options
    Restate,
}

/// Kind of a synthesized statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DdlKind {
    CreateTable,
    AlterTable,
    DropTable,
}

/// One synthesized statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdlStatement {
    pub kind: DdlKind,
    /// Full statement text, without a trailing semicolon
    pub sql: String,
    /// Column/index/constraint definitions for CREATE, clauses for ALTER
    pub clauses: Vec<String>,
}

impl std::fmt::Display for DdlStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// DDL synthesizer for MySQL tables
///
/// Holds no state besides the strategy; snapshots are only read.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlSynthesizer {
    strategy: AlterStrategy,
}

impl DdlSynthesizer {
    pub fn new(strategy: AlterStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> AlterStrategy {
        self.strategy
    }

    /// Produce the statement that takes the table from `original` to `current`.
    ///
    /// New tables get a `CREATE TABLE`; existing ones an `ALTER TABLE`, which
    /// requires the loaded snapshot.
    pub fn synthesize(
        &self,
        database: &str,
        table_name: &str,
        original: Option<&TableSnapshot>,
        current: &TableSnapshot,
        is_new_table: bool,
    ) -> DesignerResult<DdlStatement> {
        if table_name.trim().is_empty() {
            return Err(DesignerError::validation(
                "table_name",
                "Table name is required",
            ));
        }

        let errors = current.validate();
        if !errors.is_empty() {
            return Err(DesignerError::Validation(errors));
        }

        if is_new_table {
            return Ok(self.create_table(database, table_name, current));
        }

        let original = original.ok_or_else(|| {
            DesignerError::validation("original", "The loaded table structure is missing")
        })?;
        self.alter_table(database, table_name, original, current)
    }

    /// Render `CREATE TABLE` for a validated snapshot
    pub fn create_table(
        &self,
        database: &str,
        table_name: &str,
        current: &TableSnapshot,
    ) -> DdlStatement {
        let mut definitions: Vec<String> = current.columns.iter().map(build_column_def).collect();

        let groups = current.index_groups();
        let (primary, others): (Vec<_>, Vec<_>) = groups
            .iter()
            .partition(|(_, rows)| rows.first().is_some_and(|r| r.is_primary()));
        for (key_name, rows) in primary.into_iter().chain(others) {
            definitions.push(build_index_def(key_name, rows));
        }

        definitions.extend(
            current
                .foreign_keys
                .iter()
                .filter(|fk| !fk.is_deleted)
                .map(build_fk_def),
        );

        let mut sql = format!(
            "CREATE TABLE {} (\n  {}\n)",
            qualified_table(database, table_name),
            definitions.join(",\n  ")
        );
        let options = table_option_parts(&current.options);
        if !options.is_empty() {
            sql.push(' ');
            sql.push_str(&options.join(" "));
        }

        tracing::debug!(
            table = %table_name,
            definitions = definitions.len(),
            "synthesized CREATE TABLE"
        );

        DdlStatement {
            kind: DdlKind::CreateTable,
            sql,
            clauses: definitions,
        }
    }

    /// Render `ALTER TABLE`; fails when there is nothing to change
    pub fn alter_table(
        &self,
        database: &str,
        table_name: &str,
        original: &TableSnapshot,
        current: &TableSnapshot,
    ) -> DesignerResult<DdlStatement> {
        let mut clauses = Vec::new();
        self.column_clauses(original, current, &mut clauses);
        self.index_clauses(original, current, &mut clauses);
        foreign_key_clauses(original, current, &mut clauses);

        let options = match self.strategy {
            AlterStrategy::Minimal => changed_option_parts(&original.options, &current.options),
            AlterStrategy::Restate => table_option_parts(&current.options),
        };
        if !options.is_empty() {
            clauses.push(options.join(" "));
        }

        if clauses.is_empty() {
            return Err(DesignerError::validation("changes", "No changes to save"));
        }

        tracing::debug!(
            table = %table_name,
            clauses = clauses.len(),
            strategy = ?self.strategy,
            "synthesized ALTER TABLE"
        );

        Ok(DdlStatement {
            kind: DdlKind::AlterTable,
            sql: format!(
                "ALTER TABLE {}\n  {}",
                qualified_table(database, table_name),
                clauses.join(",\n  ")
            ),
            clauses,
        })
    }

    /// Render `DROP TABLE`
    pub fn drop_table(&self, database: &str, table_name: &str) -> DesignerResult<DdlStatement> {
        if table_name.trim().is_empty() {
            return Err(DesignerError::validation(
                "table_name",
                "Table name is required",
            ));
        }
        let sql = format!("DROP TABLE {}", qualified_table(database, table_name));
        Ok(DdlStatement {
            kind: DdlKind::DropTable,
            clauses: vec![sql.clone()],
            sql,
        })
    }

    /// Steps 1-3: column adds, modifications/renames, drops
    fn column_clauses(
        &self,
        original: &TableSnapshot,
        current: &TableSnapshot,
        clauses: &mut Vec<String>,
    ) {
        let originals: HashMap<&str, &ColumnDesign> = original
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();

        // Pair each kept column with the loaded column it came from
        let mut matched: HashSet<&str> = HashSet::new();
        let mut pairs: Vec<(&ColumnDesign, Option<&ColumnDesign>)> = Vec::new();
        for col in &current.columns {
            let source = if col.is_new {
                None
            } else {
                col.original_name
                    .as_deref()
                    .and_then(|name| originals.get(name).copied())
                    .filter(|source| matched.insert(source.name.as_str()))
            };
            pairs.push((col, source));
        }

        for (col, source) in &pairs {
            if source.is_none() {
                clauses.push(format!("ADD COLUMN {}", build_column_def(col)));
            }
        }

        for (col, source) in &pairs {
            let Some(source) = source else {
                continue;
            };
            let def = build_column_def(col);
            if source.name != col.name {
                clauses.push(format!("CHANGE COLUMN {} {}", quote_ident(&source.name), def));
            } else if self.strategy == AlterStrategy::Restate || def != build_column_def(source) {
                clauses.push(format!("MODIFY COLUMN {}", def));
            }
        }

        for col in &original.columns {
            if !matched.contains(col.name.as_str()) {
                clauses.push(format!("DROP COLUMN {}", quote_ident(&col.name)));
            }
        }
    }

    /// Steps 4-5: index drops, then index adds
    fn index_clauses(
        &self,
        original: &TableSnapshot,
        current: &TableSnapshot,
        clauses: &mut Vec<String>,
    ) {
        let renames = current.column_renames();
        let original_defs: Vec<(&str, String)> = original
            .index_groups()
            .into_iter()
            .map(|(key_name, rows)| {
                let renamed: Vec<IndexDesign> = rows
                    .iter()
                    .map(|row| {
                        let mut row = (*row).clone();
                        if let Some(name) = renames.get(row.column_name.as_str()) {
                            row.column_name = (*name).to_string();
                        }
                        row
                    })
                    .collect();
                let refs: Vec<&IndexDesign> = renamed.iter().collect();
                (key_name, build_index_def(key_name, &refs))
            })
            .collect();
        let current_defs: Vec<(&str, String)> = current
            .index_groups()
            .into_iter()
            .map(|(key_name, rows)| (key_name, build_index_def(key_name, &rows)))
            .collect();

        let restate = self.strategy == AlterStrategy::Restate;

        for (key_name, def) in &original_defs {
            if restate || !has_index_def(&current_defs, key_name, def) {
                clauses.push(if *key_name == PRIMARY_KEY_NAME {
                    "DROP PRIMARY KEY".to_string()
                } else {
                    format!("DROP INDEX {}", quote_ident(key_name))
                });
            }
        }

        for (key_name, def) in &current_defs {
            if restate || !has_index_def(&original_defs, key_name, def) {
                clauses.push(format!("ADD {}", def));
            }
        }
    }
}

fn has_index_def(defs: &[(&str, String)], key_name: &str, def: &str) -> bool {
    defs.iter()
        .any(|(other_name, other_def)| *other_name == key_name && other_def == def)
}

/// The loaded constraint an edited one stands for, if any
fn foreign_key_source<'a>(
    fk: &ForeignKeyDesign,
    originals: &HashMap<&str, &'a ForeignKeyDesign>,
) -> Option<&'a ForeignKeyDesign> {
    if fk.is_new {
        return None;
    }
    fk.original_name
        .as_deref()
        .and_then(|name| originals.get(name).copied())
}

/// Steps 6-8: foreign key drops, adds and modifications
fn foreign_key_clauses(original: &TableSnapshot, current: &TableSnapshot, clauses: &mut Vec<String>) {
    let originals: HashMap<&str, &ForeignKeyDesign> = original
        .foreign_keys
        .iter()
        .map(|fk| (fk.name.as_str(), fk))
        .collect();

    let renames = current.column_renames();

    let claimed: HashSet<&str> = current
        .foreign_keys
        .iter()
        .filter_map(|fk| foreign_key_source(fk, &originals).map(|source| source.name.as_str()))
        .collect();

    let mut drops = Vec::new();
    let mut adds = Vec::new();
    let mut modifies = Vec::new();

    for fk in &current.foreign_keys {
        match (foreign_key_source(fk, &originals), fk.is_deleted) {
            (Some(source), true) => {
                drops.push(format!("DROP FOREIGN KEY {}", quote_ident(&source.name)));
            }
            (None, true) => {}
            (None, false) => adds.push(format!("ADD {}", build_fk_def(fk))),
            (Some(source), false) => {
                // The server carries constraint columns through CHANGE COLUMN
                let mut renamed = source.clone();
                for column in &mut renamed.columns {
                    if let Some(name) = renames.get(column.as_str()) {
                        *column = (*name).to_string();
                    }
                }
                if fk.differs_from(&renamed) {
                    modifies.push(format!("DROP FOREIGN KEY {}", quote_ident(&source.name)));
                    modifies.push(format!("ADD {}", build_fk_def(fk)));
                }
            }
        }
    }

    // Constraints that vanished from the edited list entirely
    for fk in &original.foreign_keys {
        if !claimed.contains(fk.name.as_str()) {
            drops.push(format!("DROP FOREIGN KEY {}", quote_ident(&fk.name)));
        }
    }

    clauses.extend(drops);
    clauses.extend(adds);
    clauses.extend(modifies);
}
