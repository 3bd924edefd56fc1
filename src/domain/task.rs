use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::{ColumnId, DomainError, DomainResult};

/// Upper bound on the number of tags a single task may carry.
pub const MAX_TAGS_PER_TASK: usize = 5;

/// Palette offered when creating a tag.
pub const TAG_COLORS: [&str; 10] = [
    "#ef4444", // red
    "#f97316", // orange
    "#eab308", // yellow
    "#22c55e", // green
    "#06b6d4", // cyan
    "#3b82f6", // blue
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#6b7280", // gray
    "#84cc16", // lime
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn generate() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    pub fn generate() -> Self {
        TagId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        TagId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
}

impl Tag {
    /// Create a tag with a fresh id. The name is trimmed.
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            id: TagId::generate(),
            name: name.trim().to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Priority::High => "#ef4444",   // red
            Priority::Medium => "#f59e0b", // amber
            Priority::Low => "#10b981",    // emerald
        }
    }

    /// Next priority in the low -> medium -> high -> low cycle.
    pub fn cycle(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub column_id: ColumnId,
    pub position: usize,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Due date lies strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.map(|due| due < today).unwrap_or(false)
    }

    /// Due date falls within `today..=today + days`.
    pub fn is_due_soon(&self, today: NaiveDate, days: i64) -> bool {
        self.due_date
            .map(|due| {
                let horizon = today + chrono::Duration::days(days);
                due >= today && due <= horizon
            })
            .unwrap_or(false)
    }

    /// Format due date for display
    pub fn due_date_display(&self, today: NaiveDate) -> String {
        match self.due_date {
            None => String::new(),
            Some(due) => match (due - today).num_days() {
                0 => "Today".to_string(),
                1 => "Tomorrow".to_string(),
                -1 => "Yesterday".to_string(),
                d if d < 0 => format!("{} days ago", -d),
                d if d <= 7 => format!("In {d} days"),
                _ => due.format("%b %-d, %Y").to_string(),
            },
        }
    }

    pub fn has_tag_named(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Check the tag cap and per-task name uniqueness.
pub fn validate_tags(tags: &[Tag]) -> DomainResult<()> {
    if tags.len() > MAX_TAGS_PER_TASK {
        return Err(DomainError::TagLimitExceeded {
            max: MAX_TAGS_PER_TASK,
        });
    }
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.name.as_str()) {
            return Err(DomainError::DuplicateTagName(tag.name.clone()));
        }
    }
    Ok(())
}

pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let head: String = text.chars().take(max_length).collect();
    format!("{head}...")
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub column_id: ColumnId,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub blocked: Option<bool>,
    pub tags: Vec<Tag>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            title: title.into(),
            column_id: column_id.into(),
            ..Default::default()
        }
    }
}

/// Patch for an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub blocked: Option<bool>,
    pub completed: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}

impl TaskUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DomainError::EmptyTitle);
            }
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(blocked) = self.blocked {
            task.blocked = blocked;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
    }
}

/// Relocation of a task to a column and slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTask {
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub destination_column_id: ColumnId,
    pub destination_position: usize,
}
