//! Table snapshot model

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tablewright_core::{ColumnInfo, ForeignKeyInfo, IndexInfo, TableStatusInfo};

use super::{
    ColumnDesign, ColumnKey, DefaultValue, ForeignKeyDesign, IndexDesign, PRIMARY_KEY_NAME,
    TableOptions, ValidationError,
};

/// A table's columns, index rows, foreign keys and options at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Vec<ColumnDesign>,
    #[serde(default)]
    pub indexes: Vec<IndexDesign>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDesign>,
    #[serde(default)]
    pub options: TableOptions,
}

impl TableSnapshot {
    /// Empty snapshot with MySQL default options, for a table being created
    pub fn new_default() -> Self {
        Self {
            options: TableOptions::mysql(),
            ..Self::default()
        }
    }

    /// Build from catalogue records
    pub fn from_catalog(
        status: &TableStatusInfo,
        columns: &[ColumnInfo],
        indexes: &[IndexInfo],
        foreign_keys: &[ForeignKeyInfo],
    ) -> Self {
        let mut columns: Vec<&ColumnInfo> = columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal);

        Self {
            columns: columns
                .into_iter()
                .map(ColumnDesign::from_column_info)
                .collect(),
            indexes: indexes.iter().map(IndexDesign::from_index_info).collect(),
            foreign_keys: ForeignKeyDesign::from_foreign_key_infos(foreign_keys),
            options: TableOptions::from_status(status),
        }
    }

    /// Builder: add a column
    pub fn with_column(mut self, column: ColumnDesign) -> Self {
        self.columns.push(column);
        self
    }

    /// Builder: add an index row
    pub fn with_index(mut self, index: IndexDesign) -> Self {
        self.indexes.push(index);
        self
    }

    /// Builder: add a foreign key
    pub fn with_foreign_key(mut self, fk: ForeignKeyDesign) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Builder: set options
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Find a column by name, ignoring case
    pub fn column(&self, name: &str) -> Option<&ColumnDesign> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get column names for use in pickers
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Index rows grouped by key name, groups in order of first appearance
    pub fn index_groups(&self) -> Vec<(&str, Vec<&IndexDesign>)> {
        let mut groups: Vec<(&str, Vec<&IndexDesign>)> = Vec::new();
        for index in &self.indexes {
            match groups.iter_mut().find(|(name, _)| *name == index.key_name) {
                Some((_, rows)) => rows.push(index),
                None => groups.push((index.key_name.as_str(), vec![index])),
            }
        }
        groups
    }

    /// Map of load-time column name to current name for every renamed column
    pub fn column_renames(&self) -> HashMap<&str, &str> {
        self.columns
            .iter()
            .filter(|c| !c.is_new)
            .filter_map(|c| {
                c.original_name
                    .as_deref()
                    .filter(|original| *original != c.name)
                    .map(|original| (original, c.name.as_str()))
            })
            .collect()
    }

    /// The snapshot as it stands once these edits have been applied to the database
    pub fn committed(&self) -> Self {
        let mut snapshot = self.clone();
        for column in &mut snapshot.columns {
            column.is_new = false;
            column.original_name = Some(column.name.clone());
        }
        snapshot.foreign_keys.retain(|fk| !fk.is_deleted);
        for fk in &mut snapshot.foreign_keys {
            fk.is_new = false;
            fk.original_name = Some(fk.name.clone());
        }
        snapshot
    }

    /// Check the design for errors that would make any synthesized DDL invalid
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.columns.is_empty() {
            errors.push(ValidationError::new(
                "columns",
                "At least one column is required",
            ));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if col.name.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("columns[{}].name", i),
                    format!("Column {} name is required", i + 1),
                ));
            }
            if col.data_type.base_type.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("columns[{}].type", i),
                    format!("Column {} data type is required", i + 1),
                ));
            }
            if !col.nullable && col.default == DefaultValue::Null {
                errors.push(ValidationError::new(
                    format!("columns[{}].default", i),
                    format!("Column '{}' is NOT NULL but defaults to NULL", col.name),
                ));
            }
        }

        // Check for duplicate column names
        let mut seen_names = HashSet::new();
        for col in &self.columns {
            if !col.name.is_empty() && !seen_names.insert(col.name.to_lowercase()) {
                errors.push(ValidationError::new(
                    "columns",
                    format!("Duplicate column name: {}", col.name),
                ));
            }
        }

        let auto_increment: Vec<&ColumnDesign> = self
            .columns
            .iter()
            .filter(|c| c.extra.auto_increment)
            .collect();
        if auto_increment.len() > 1 {
            errors.push(ValidationError::new(
                "columns",
                "Only one column can be auto-increment",
            ));
        }
        for col in auto_increment {
            let indexed = self
                .indexes
                .iter()
                .any(|idx| idx.column_name.eq_ignore_ascii_case(&col.name));
            if col.key == ColumnKey::None && !indexed {
                errors.push(ValidationError::new(
                    "columns",
                    format!("Auto-increment column '{}' must be part of a key", col.name),
                ));
            }
        }

        let column_names: HashSet<_> = self.columns.iter().map(|c| c.name.to_lowercase()).collect();

        let primary_groups = self
            .index_groups()
            .iter()
            .filter(|(_, rows)| rows.iter().any(|r| r.is_primary()))
            .count();
        if primary_groups > 1 {
            errors.push(ValidationError::new(
                "indexes",
                "A table can have only one primary key",
            ));
        }

        // Validate index rows
        for (i, idx) in self.indexes.iter().enumerate() {
            if idx.key_name.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("indexes[{}].key_name", i),
                    format!("Index {} name is required", i + 1),
                ));
            }
            if idx.is_primary() != (idx.key_name == PRIMARY_KEY_NAME) {
                errors.push(ValidationError::new(
                    format!("indexes[{}].kind", i),
                    "Only the PRIMARY key may be named PRIMARY",
                ));
            }
            if !column_names.contains(&idx.column_name.to_lowercase()) {
                errors.push(ValidationError::new(
                    format!("indexes[{}].column_name", i),
                    format!("Index column '{}' does not exist in table", idx.column_name),
                ));
            }
        }
        for (key_name, rows) in self.index_groups() {
            if rows.iter().any(|r| r.kind != rows[0].kind) {
                errors.push(ValidationError::new(
                    "indexes",
                    format!("Index '{}' mixes index kinds", key_name),
                ));
            }
        }

        // Validate foreign keys
        for (i, fk) in self.foreign_keys.iter().enumerate() {
            if fk.is_deleted {
                continue;
            }
            if fk.name.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].name", i),
                    format!("Foreign key {} name is required", i + 1),
                ));
            }
            if fk.columns.is_empty() {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].columns", i),
                    "Foreign key needs at least one column",
                ));
            }
            for col in &fk.columns {
                if !column_names.contains(&col.to_lowercase()) {
                    errors.push(ValidationError::new(
                        format!("foreign_keys[{}].columns", i),
                        format!("Foreign key column '{}' does not exist in table", col),
                    ));
                }
            }
            if fk.referenced_table.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].referenced_table", i),
                    "Referenced table is required",
                ));
            }
            if fk.referenced_columns.is_empty()
                || fk.referenced_columns.iter().any(|c| c.trim().is_empty())
            {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].referenced_columns", i),
                    "Referenced column is required",
                ));
            } else if fk.referenced_columns.len() != fk.columns.len() {
                errors.push(ValidationError::new(
                    format!("foreign_keys[{}].referenced_columns", i),
                    "Foreign key must reference as many columns as it constrains",
                ));
            }
        }

        errors
    }
}
