//! Seed data used when nothing has been stored yet.

use chrono::Utc;

use super::{AppData, AppSettings, Board, BoardId, Column, Priority, Tag, TagId, Task};

pub const DEFAULT_BOARD_ID: &str = "default-board";

pub fn default_board() -> Board {
    let now = Utc::now();
    let column = |id: &str, title: &str, position: usize, color: &str| Column {
        id: id.into(),
        title: title.to_string(),
        position,
        color: Some(color.to_string()),
    };

    Board {
        id: BoardId::from(DEFAULT_BOARD_ID),
        title: "My Kanban Board".to_string(),
        columns: vec![
            column("todo", "To Do", 0, "#6b7280"),
            column("in-progress", "In Progress", 1, "#3b82f6"),
            column("review", "Review", 2, "#f59e0b"),
            column("done", "Done", 3, "#10b981"),
        ],
        created_at: now,
        updated_at: now,
    }
}

pub fn default_tasks() -> Vec<Task> {
    let now = Utc::now();
    let sample = |id: &str, title: &str, description: &str, column: &str, priority: Priority| Task {
        id: id.into(),
        title: title.to_string(),
        description: Some(description.to_string()),
        column_id: column.into(),
        position: 0,
        priority,
        due_date: None,
        blocked: false,
        completed: false,
        tags: vec![],
        created_at: now,
        updated_at: now,
    };

    let mut welcome = sample(
        "sample-task-1",
        "Welcome to TaskFlow!",
        "This is a sample task to get you started. You can edit or delete this task.",
        "todo",
        Priority::Medium,
    );
    welcome.tags.push(Tag {
        id: TagId::from("tag-1"),
        name: "Welcome".to_string(),
        color: "#3b82f6".to_string(),
    });

    let mut drag = sample(
        "sample-task-2",
        "Try drag and drop",
        "Pick this task up with Space and drop it in another column.",
        "in-progress",
        Priority::High,
    );
    drag.tags.push(Tag {
        id: TagId::from("tag-2"),
        name: "Demo".to_string(),
        color: "#10b981".to_string(),
    });

    let mut done = sample(
        "sample-task-3",
        "Completed task example",
        "This shows how completed tasks look.",
        "done",
        Priority::Low,
    );
    done.completed = true;

    vec![welcome, drag, done]
}

pub fn default_app_data() -> AppData {
    AppData {
        board: default_board(),
        tasks: default_tasks(),
        settings: AppSettings::default(),
    }
}
