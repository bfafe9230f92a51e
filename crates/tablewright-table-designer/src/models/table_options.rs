//! Table-level storage options

use serde::{Deserialize, Serialize};
use tablewright_core::TableStatusInfo;

/// Storage options of a MySQL table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Storage engine (InnoDB, MyISAM, etc.)
    pub engine: Option<String>,
    /// Character set
    pub charset: Option<String>,
    /// Collation
    pub collation: Option<String>,
    pub comment: Option<String>,
    /// AUTO_INCREMENT starting value
    pub auto_increment: Option<u64>,
    /// Row format (DYNAMIC, COMPACT, etc.)
    pub row_format: Option<String>,
}

impl TableOptions {
    /// Defaults for a new MySQL table
    pub fn mysql() -> Self {
        Self {
            engine: Some("InnoDB".to_string()),
            charset: Some("utf8mb4".to_string()),
            collation: Some("utf8mb4_general_ci".to_string()),
            ..Default::default()
        }
    }

    /// Create from the server's table status
    pub fn from_status(status: &TableStatusInfo) -> Self {
        Self {
            engine: status.engine.clone(),
            charset: status.charset.clone(),
            collation: status.collation.clone(),
            comment: status.comment.clone(),
            auto_increment: status.auto_increment,
            row_format: status.row_format.clone(),
        }
    }
}
