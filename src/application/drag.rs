//! Drag-and-drop session tracking.
//!
//! A session starts when a task is picked up and ends on drop or cancel.
//! Hover updates only record the target for highlighting; the task store is
//! touched once, on a drop that resolves to an actual move.

use super::TaskRepository;
use crate::domain::{array_move, ColumnId, MoveTask, Task, TaskId};

/// Prefix that marks a drop target id as a column drop zone.
pub const COLUMN_DROP_PREFIX: &str = "column-";

pub fn column_drop_zone_id(column_id: &ColumnId) -> String {
    format!("{COLUMN_DROP_PREFIX}{column_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(ColumnId),
    Task(TaskId),
}

impl DropTarget {
    /// Ids carrying the column prefix are column zones; anything else is a task.
    pub fn classify(id: &str) -> Self {
        match id.strip_prefix(COLUMN_DROP_PREFIX) {
            Some(column) => DropTarget::Column(column.into()),
            None => DropTarget::Task(id.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: Option<Task>,
        over: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_task(&self) -> Option<&Task> {
        match &self.state {
            DragState::Dragging { active, .. } => active.as_ref(),
            DragState::Idle => None,
        }
    }

    pub fn over_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_deref(),
            DragState::Idle => None,
        }
    }

    /// Enter the dragging state with a snapshot of the task, which is absent
    /// when the id is unknown.
    pub fn on_drag_start(&mut self, tasks: &TaskRepository, active_id: &TaskId) {
        let active = tasks.get_task(active_id).cloned();
        if active.is_none() {
            tracing::debug!("Drag started on unknown task {}", active_id);
        }
        self.state = DragState::Dragging { active, over: None };
    }

    pub fn on_drag_over(&mut self, over_id: Option<&str>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = over_id.map(str::to_string);
        }
    }

    /// Finish the session, applying at most one move. Returns the move that
    /// was handed to the repository.
    pub fn on_drag_end(
        &mut self,
        tasks: &mut TaskRepository,
        active_id: &TaskId,
        over_id: Option<&str>,
    ) -> Option<MoveTask> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging {
            active: Some(active),
            ..
        } = state
        else {
            return None;
        };
        let over_id = over_id?;

        let intent = Self::resolve(tasks, &active, active_id, over_id)?;
        tasks.move_task(&intent);
        Some(intent)
    }

    pub fn on_drag_cancel(&mut self) {
        self.state = DragState::Idle;
    }

    fn resolve(
        tasks: &TaskRepository,
        active: &Task,
        active_id: &TaskId,
        over_id: &str,
    ) -> Option<MoveTask> {
        match DropTarget::classify(over_id) {
            DropTarget::Column(destination) => {
                if destination == active.column_id {
                    return None;
                }
                Some(MoveTask {
                    task_id: active_id.clone(),
                    source_column_id: active.column_id.clone(),
                    destination_position: tasks.count_in_column(&destination),
                    destination_column_id: destination,
                })
            }
            DropTarget::Task(over_task_id) => {
                let over_task = tasks.get_task(&over_task_id)?;

                if over_task.column_id != active.column_id {
                    return Some(MoveTask {
                        task_id: active_id.clone(),
                        source_column_id: active.column_id.clone(),
                        destination_column_id: over_task.column_id.clone(),
                        destination_position: over_task.position,
                    });
                }

                let mut ordered: Vec<&TaskId> = tasks
                    .tasks_by_column(&active.column_id)
                    .into_iter()
                    .map(|t| &t.id)
                    .collect();
                let active_index = ordered.iter().position(|id| *id == active_id)?;
                let over_index = ordered.iter().position(|id| **id == over_task_id)?;
                if active_index == over_index {
                    return None;
                }

                array_move(&mut ordered, active_index, over_index);
                let new_position = ordered.iter().position(|id| *id == active_id)?;

                Some(MoveTask {
                    task_id: active_id.clone(),
                    source_column_id: active.column_id.clone(),
                    destination_column_id: active.column_id.clone(),
                    destination_position: new_position,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryKeyValueStore;
    use crate::application::Persistence;
    use crate::domain::NewTask;
    use std::sync::Arc;

    fn board() -> (TaskRepository, Vec<TaskId>) {
        let persistence = Arc::new(Persistence::new(Box::new(MemoryKeyValueStore::new())));
        let mut repo = TaskRepository::new(persistence);
        repo.replace_all(Vec::new());
        let ids = [
            ("A", "todo"),
            ("B", "todo"),
            ("C", "todo"),
            ("D", "todo"),
            ("X", "done"),
        ]
        .into_iter()
        .map(|(title, column)| repo.add_task(NewTask::new(title, column)).unwrap())
        .collect();
        (repo, ids)
    }

    fn titles(repo: &TaskRepository, column: &str) -> Vec<String> {
        repo.tasks_by_column(&column.into())
            .into_iter()
            .map(|t| t.title.clone())
            .collect()
    }

    fn drag(repo: &mut TaskRepository, active: &TaskId, over: Option<&str>) -> Option<MoveTask> {
        let mut coordinator = DragCoordinator::new();
        coordinator.on_drag_start(repo, active);
        coordinator.on_drag_over(over);
        let result = coordinator.on_drag_end(repo, active, over);
        assert_eq!(coordinator.state(), &DragState::Idle);
        result
    }

    #[test]
    fn test_classify_targets() {
        assert_eq!(
            DropTarget::classify("column-done"),
            DropTarget::Column("done".into())
        );
        assert_eq!(DropTarget::classify("abc"), DropTarget::Task("abc".into()));
        assert_eq!(
            DropTarget::classify(&column_drop_zone_id(&"in-progress".into())),
            DropTarget::Column("in-progress".into())
        );
    }

    #[test]
    fn test_state_transitions() {
        let (repo, ids) = board();
        let mut coordinator = DragCoordinator::new();
        assert!(!coordinator.is_dragging());

        coordinator.on_drag_start(&repo, &ids[0]);
        assert!(coordinator.is_dragging());
        assert_eq!(coordinator.active_task().unwrap().title, "A");

        coordinator.on_drag_over(Some("column-done"));
        assert_eq!(coordinator.over_id(), Some("column-done"));
        coordinator.on_drag_over(None);
        assert_eq!(coordinator.over_id(), None);

        coordinator.on_drag_cancel();
        assert_eq!(coordinator.state(), &DragState::Idle);
        assert_eq!(coordinator.over_id(), None);
    }

    #[test]
    fn test_hover_outside_session_is_ignored() {
        let mut coordinator = DragCoordinator::new();
        coordinator.on_drag_over(Some("column-done"));
        assert_eq!(coordinator.state(), &DragState::Idle);
    }

    #[test]
    fn test_cancel_does_not_mutate() {
        let (mut repo, ids) = board();
        let before = repo.tasks().to_vec();
        let mut coordinator = DragCoordinator::new();
        coordinator.on_drag_start(&repo, &ids[0]);
        coordinator.on_drag_over(Some("column-done"));
        coordinator.on_drag_cancel();

        assert_eq!(coordinator.on_drag_end(&mut repo, &ids[0], Some("column-done")), None);
        assert_eq!(repo.tasks(), &before[..]);
    }

    #[test]
    fn test_unknown_active_task_still_drags() {
        let (mut repo, _) = board();
        let mut coordinator = DragCoordinator::new();
        coordinator.on_drag_start(&repo, &"ghost".into());
        assert!(coordinator.is_dragging());
        assert!(coordinator.active_task().is_none());

        let result = coordinator.on_drag_end(&mut repo, &"ghost".into(), Some("column-done"));
        assert_eq!(result, None);
        assert!(!coordinator.is_dragging());
    }

    #[test]
    fn test_drop_without_target() {
        let (mut repo, ids) = board();
        assert_eq!(drag(&mut repo, &ids[0], None), None);
        assert_eq!(titles(&repo, "todo"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_drop_on_other_column_appends() {
        let (mut repo, ids) = board();
        let result = drag(&mut repo, &ids[1], Some("column-done")).unwrap();
        assert_eq!(result.destination_position, 1);
        assert_eq!(titles(&repo, "todo"), vec!["A", "C", "D"]);
        assert_eq!(titles(&repo, "done"), vec!["X", "B"]);
    }

    #[test]
    fn test_drop_on_empty_column() {
        let (mut repo, ids) = board();
        drag(&mut repo, &ids[0], Some("column-review")).unwrap();
        assert_eq!(titles(&repo, "review"), vec!["A"]);
        assert_eq!(repo.get_task(&ids[0]).unwrap().position, 0);
    }

    #[test]
    fn test_drop_on_own_column_is_noop() {
        let (mut repo, ids) = board();
        assert_eq!(drag(&mut repo, &ids[1], Some("column-todo")), None);
        assert_eq!(titles(&repo, "todo"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_drop_on_task_in_other_column_takes_its_slot() {
        let (mut repo, ids) = board();
        let x = ids[4].0.clone();
        let result = drag(&mut repo, &ids[2], Some(&x)).unwrap();
        assert_eq!(result.destination_position, 0);
        assert_eq!(titles(&repo, "done"), vec!["C", "X"]);
        assert_eq!(titles(&repo, "todo"), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_same_column_forward_and_backward() {
        // Moving A (index 0) onto D (index 3) lands at index 3
        let (mut repo, ids) = board();
        let d = ids[3].0.clone();
        let result = drag(&mut repo, &ids[0], Some(&d)).unwrap();
        assert_eq!(result.destination_position, 3);
        assert_eq!(titles(&repo, "todo"), vec!["B", "C", "D", "A"]);

        // Moving D (now index 2) onto B (index 0) lands at index 0
        let b = ids[1].0.clone();
        let result = drag(&mut repo, &ids[3], Some(&b)).unwrap();
        assert_eq!(result.destination_position, 0);
        assert_eq!(titles(&repo, "todo"), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_drop_onto_itself_or_unknown_task() {
        let (mut repo, ids) = board();
        let a = ids[0].0.clone();
        assert_eq!(drag(&mut repo, &ids[0], Some(&a)), None);
        assert_eq!(drag(&mut repo, &ids[0], Some("ghost")), None);
        assert_eq!(titles(&repo, "todo"), vec!["A", "B", "C", "D"]);
    }
}
