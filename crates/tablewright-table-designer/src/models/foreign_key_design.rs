//! Foreign key design model

use serde::{Deserialize, Serialize};
use tablewright_core::{ForeignKeyAction, ForeignKeyInfo};

/// Foreign key design model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDesign {
    /// Constraint name
    pub name: String,
    /// Local columns
    pub columns: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced columns
    pub referenced_columns: Vec<String>,
    #[serde(default)]
    pub on_update: ForeignKeyAction,
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
    /// Created in this session
    #[serde(default)]
    pub is_new: bool,
    /// Marked for removal on the next save
    #[serde(default)]
    pub is_deleted: bool,
    /// Constraint name at load time
    #[serde(default)]
    pub original_name: Option<String>,
}

impl ForeignKeyDesign {
    /// Create a constraint that does not exist in the database yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            referenced_table: String::new(),
            referenced_columns: Vec::new(),
            on_update: ForeignKeyAction::Restrict,
            on_delete: ForeignKeyAction::Restrict,
            is_new: true,
            is_deleted: false,
            original_name: None,
        }
    }

    /// Group catalogue rows (one per column) into constraints, keeping first-seen order
    pub fn from_foreign_key_infos(rows: &[ForeignKeyInfo]) -> Vec<Self> {
        let mut designs: Vec<ForeignKeyDesign> = Vec::new();
        for row in rows {
            match designs.iter_mut().find(|fk| fk.name == row.name) {
                Some(fk) => {
                    fk.columns.push(row.column.clone());
                    fk.referenced_columns.push(row.referenced_column.clone());
                }
                None => designs.push(ForeignKeyDesign {
                    name: row.name.clone(),
                    columns: vec![row.column.clone()],
                    referenced_table: row.referenced_table.clone(),
                    referenced_columns: vec![row.referenced_column.clone()],
                    on_update: row.on_update,
                    on_delete: row.on_delete,
                    is_new: false,
                    is_deleted: false,
                    original_name: Some(row.name.clone()),
                }),
            }
        }
        designs
    }

    /// Builder: mark as an already-existing constraint loaded under its current name
    pub fn existing(mut self) -> Self {
        self.is_new = false;
        self.original_name = Some(self.name.clone());
        self
    }

    /// Builder: add local column
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Builder: set referenced table
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.referenced_table = table.into();
        self
    }

    /// Builder: add referenced column
    pub fn referenced_column(mut self, name: impl Into<String>) -> Self {
        self.referenced_columns.push(name.into());
        self
    }

    /// Builder: set on delete action
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Builder: set on update action
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }

    /// Whether the constraint definition differs from `other`, ignoring bookkeeping
    pub fn differs_from(&self, other: &ForeignKeyDesign) -> bool {
        self.name != other.name
            || self.columns != other.columns
            || self.referenced_table != other.referenced_table
            || self.referenced_columns != other.referenced_columns
            || self.on_update != other.on_update
            || self.on_delete != other.on_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, column: &str, referenced_column: &str) -> ForeignKeyInfo {
        ForeignKeyInfo {
            name: name.into(),
            column: column.into(),
            referenced_table: "accounts".into(),
            referenced_column: referenced_column.into(),
            on_update: ForeignKeyAction::Cascade,
            on_delete: ForeignKeyAction::SetNull,
        }
    }

    #[test]
    fn test_rows_group_by_constraint_name() {
        let designs = ForeignKeyDesign::from_foreign_key_infos(&[
            row("fk_owner", "owner_id", "id"),
            row("fk_region", "region", "region"),
            row("fk_region", "shard", "shard"),
        ]);

        assert_eq!(designs.len(), 2);
        assert_eq!(designs[0].columns, vec!["owner_id"]);
        assert_eq!(designs[1].columns, vec!["region", "shard"]);
        assert_eq!(designs[1].referenced_columns, vec!["region", "shard"]);
        assert_eq!(designs[1].original_name.as_deref(), Some("fk_region"));
        assert!(!designs[1].is_new);
    }

    #[test]
    fn test_differs_ignores_bookkeeping() {
        let original = ForeignKeyDesign::new("fk").column("a").references("t").referenced_column("id").existing();
        let mut edited = original.clone();
        edited.is_deleted = true;
        assert!(!edited.differs_from(&original));

        edited.on_delete = ForeignKeyAction::Cascade;
        assert!(edited.differs_from(&original));
    }
}
