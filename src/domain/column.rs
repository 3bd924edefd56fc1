use serde::{Deserialize, Serialize};
use std::fmt;

/// Color given to columns created without one.
pub const DEFAULT_COLUMN_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

impl ColumnId {
    pub fn generate() -> Self {
        ColumnId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        ColumnId(s)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        ColumnId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Column {
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLUMN_COLOR)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    pub title: Option<String>,
    pub color: Option<Option<String>>,
}
