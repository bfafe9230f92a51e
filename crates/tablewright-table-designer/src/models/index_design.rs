//! Index design model
//!
//! Indexes are stored one row per column. Rows sharing a key name form one
//! index, in the order they appear.

use serde::{Deserialize, Serialize};
use tablewright_core::IndexInfo;

/// Reserved key name of the primary key
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// Index kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexKind {
    Primary,
    Unique,
    Fulltext,
    Spatial,
    #[default]
    Normal,
}

/// Index storage method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexMethod {
    #[default]
    Btree,
    Hash,
}

impl IndexMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IndexMethod::Btree => "BTREE",
            IndexMethod::Hash => "HASH",
        }
    }
}

/// One column of one index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDesign {
    /// Index name; `PRIMARY` for the primary key
    pub key_name: String,
    /// Indexed column
    pub column_name: String,
    #[serde(default)]
    pub kind: IndexKind,
    #[serde(default)]
    pub method: IndexMethod,
    #[serde(default)]
    pub comment: String,
}

impl IndexDesign {
    /// Create a normal index row
    pub fn new(key_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            column_name: column_name.into(),
            kind: IndexKind::Normal,
            method: IndexMethod::Btree,
            comment: String::new(),
        }
    }

    /// Create a primary key row
    pub fn primary(column_name: impl Into<String>) -> Self {
        Self::new(PRIMARY_KEY_NAME, column_name).kind(IndexKind::Primary)
    }

    /// Create from existing index info
    pub fn from_index_info(info: &IndexInfo) -> Self {
        let index_type = info.index_type.to_uppercase();
        let kind = if info.key_name == PRIMARY_KEY_NAME {
            IndexKind::Primary
        } else if index_type == "FULLTEXT" {
            IndexKind::Fulltext
        } else if index_type == "SPATIAL" {
            IndexKind::Spatial
        } else if !info.non_unique {
            IndexKind::Unique
        } else {
            IndexKind::Normal
        };

        Self {
            key_name: info.key_name.clone(),
            column_name: info.column_name.clone(),
            kind,
            method: if index_type == "HASH" {
                IndexMethod::Hash
            } else {
                IndexMethod::Btree
            },
            comment: info.comment.clone(),
        }
    }

    /// Builder: set kind
    pub fn kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set as unique
    pub fn unique(self) -> Self {
        self.kind(IndexKind::Unique)
    }

    /// Builder: set storage method
    pub fn method(mut self, method: IndexMethod) -> Self {
        self.method = method;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }
}
