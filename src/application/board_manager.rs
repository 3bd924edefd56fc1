use std::sync::Arc;

use super::{
    AppResult, ColumnRepository, DragCoordinator, Persistence, SettingsRepository, TaskRepository,
};
use crate::domain::{ColumnId, DomainError, DomainResult, MoveTask, NewTask, Task, TaskId};

/// Entry point for the UI and CLI: one persistence handle shared by the
/// column, task and settings repositories, plus the drag session.
pub struct BoardManager {
    persistence: Arc<Persistence>,
    columns: ColumnRepository,
    tasks: TaskRepository,
    settings: SettingsRepository,
    drag: DragCoordinator,
}

impl BoardManager {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self {
            columns: ColumnRepository::new(persistence.clone()),
            tasks: TaskRepository::new(persistence.clone()),
            settings: SettingsRepository::new(persistence.clone()),
            drag: DragCoordinator::new(),
            persistence,
        }
    }

    /// Load board, tasks and settings from a single stored snapshot.
    pub fn initialize(&mut self) {
        let data = self.persistence.load();
        tracing::info!(
            "Loaded board '{}' with {} columns and {} tasks",
            data.board.title,
            data.board.columns.len(),
            data.tasks.len()
        );
        self.columns.replace_board(data.board);
        self.tasks.replace_all(data.tasks);
        self.settings.replace(data.settings);
    }

    pub fn columns(&self) -> &ColumnRepository {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnRepository {
        &mut self.columns
    }

    pub fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRepository {
        &mut self.tasks
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRepository {
        &mut self.settings
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Tasks of a column in position order, without completed ones when the
    /// user has hidden them.
    pub fn visible_tasks(&self, column_id: &ColumnId) -> Vec<&Task> {
        let show_completed = self.settings.settings().show_completed_tasks;
        self.tasks
            .tasks_by_column(column_id)
            .into_iter()
            .filter(|t| show_completed || !t.completed)
            .collect()
    }

    /// Tasks pointing at a column that is no longer on the board.
    pub fn orphaned_tasks(&self) -> Vec<&Task> {
        let board = self.columns.board();
        self.tasks
            .tasks()
            .iter()
            .filter(|t| !board.has_column(&t.column_id))
            .collect()
    }

    /// Create a task, falling back to the configured default priority.
    pub fn add_task(&mut self, mut input: NewTask) -> DomainResult<TaskId> {
        if input.priority.is_none() {
            input.priority = Some(self.settings.settings().default_priority);
        }
        self.tasks.add_task(input)
    }

    /// Move a task within or across columns; the source column is taken from
    /// the task itself. Without a position the task goes to the end. A given
    /// position must lie within the destination: up to `count` for another
    /// column, up to `count - 1` for the task's own column.
    pub fn move_task_to(
        &mut self,
        task_id: &TaskId,
        column_id: &ColumnId,
        position: Option<usize>,
    ) -> DomainResult<bool> {
        let Some(source) = self.tasks.get_task(task_id).map(|t| t.column_id.clone()) else {
            return Ok(false);
        };
        let count = self.tasks.count_in_column(column_id);
        let last = if &source == column_id {
            count.saturating_sub(1)
        } else {
            count
        };
        let destination_position = match position {
            Some(position) if position > last => {
                return Err(DomainError::PositionOutOfRange {
                    position,
                    max: last,
                });
            }
            Some(position) => position,
            None => last,
        };
        Ok(self.tasks.move_task(&MoveTask {
            task_id: task_id.clone(),
            source_column_id: source,
            destination_column_id: column_id.clone(),
            destination_position,
        }))
    }

    pub fn drag_start(&mut self, active_id: &TaskId) {
        self.drag.on_drag_start(&self.tasks, active_id);
    }

    pub fn drag_over(&mut self, over_id: Option<&str>) {
        self.drag.on_drag_over(over_id);
    }

    pub fn drag_end(&mut self, active_id: &TaskId, over_id: Option<&str>) -> Option<MoveTask> {
        self.drag.on_drag_end(&mut self.tasks, active_id, over_id)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.on_drag_cancel();
    }

    pub fn export_json(&self) -> AppResult<String> {
        self.persistence.export_json()
    }

    /// Import a snapshot and adopt it in memory. On failure nothing changes.
    pub fn import_json(&mut self, json: &str) -> AppResult<()> {
        let data = self.persistence.import_json(json)?;
        self.drag.on_drag_cancel();
        self.columns.replace_board(data.board);
        self.tasks.replace_all(data.tasks);
        self.settings.replace(data.settings);
        Ok(())
    }

    /// Wipe stored data and fall back to the defaults.
    pub fn reset(&mut self) {
        self.persistence.clear();
        self.drag.on_drag_cancel();
        self.initialize();
    }
}
