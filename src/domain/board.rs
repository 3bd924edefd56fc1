use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Column;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub String);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BoardId {
    fn from(s: &str) -> Self {
        BoardId(s.to_string())
    }
}

/// Missing fields in a stored or imported board fall back to the default board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Board {
    fn default() -> Self {
        super::defaults::default_board()
    }
}

impl Board {
    /// Columns in board order.
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.position);
        columns
    }

    pub fn has_column(&self, id: &super::ColumnId) -> bool {
        self.columns.iter().any(|c| &c.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    pub title: Option<String>,
}
