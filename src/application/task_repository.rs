use chrono::Utc;
use std::sync::Arc;

use super::Persistence;
use crate::domain::{
    validate_tags, ColumnId, DomainError, DomainResult, MoveTask, NewTask, Tag, TagId, Task,
    TaskId, TaskUpdate, MAX_TAGS_PER_TASK,
};

/// In-memory task collection. Every successful mutation writes the whole
/// collection back through [`Persistence`] before returning; operations on an
/// unknown id change nothing and return `false`.
pub struct TaskRepository {
    tasks: Vec<Task>,
    persistence: Arc<Persistence>,
}

impl TaskRepository {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self {
            tasks: Vec::new(),
            persistence,
        }
    }

    pub fn load(&mut self) {
        self.tasks = self.persistence.load().tasks;
    }

    /// Adopt tasks that are already persisted (after an import).
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks of one column in position order.
    pub fn tasks_by_column(&self, column_id: &ColumnId) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| &t.column_id == column_id)
            .collect();
        tasks.sort_by_key(|t| t.position);
        tasks
    }

    pub fn count_in_column(&self, column_id: &ColumnId) -> usize {
        self.tasks.iter().filter(|t| &t.column_id == column_id).count()
    }

    pub fn add_task(&mut self, input: NewTask) -> DomainResult<TaskId> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        validate_tags(&input.tags)?;

        let now = Utc::now();
        let task = Task {
            id: TaskId::generate(),
            title: title.to_string(),
            description: input.description,
            position: self.count_in_column(&input.column_id),
            column_id: input.column_id,
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            blocked: input.blocked.unwrap_or(false),
            completed: false,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };
        let id = task.id.clone();
        tracing::debug!(
            "Adding task {} to column {} at {}",
            id,
            task.column_id,
            task.position
        );

        self.tasks.push(task);
        self.persist();
        Ok(id)
    }

    pub fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> DomainResult<bool> {
        update.validate()?;
        let Some(task) = self.find_mut(id) else {
            return Ok(false);
        };
        update.apply_to(task);
        task.touch();
        self.persist();
        Ok(true)
    }

    /// Remove a task. Siblings keep their positions, so the column may be
    /// left with a gap.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Relocate a task to `destination_column_id` at `destination_position`.
    ///
    /// The gap in the source column is closed first, then a slot is opened in
    /// the destination, evaluated against the post-removal state. For a move
    /// within one column this behaves as a stable array move. The destination
    /// position is trusted as given.
    pub fn move_task(&mut self, input: &MoveTask) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == input.task_id) else {
            return false;
        };
        let mut moved = self.tasks.remove(index);
        let original_position = moved.position;

        for task in &mut self.tasks {
            if task.column_id == input.source_column_id && task.position > original_position {
                task.position -= 1;
            }
        }

        for task in &mut self.tasks {
            if task.column_id == input.destination_column_id
                && task.position >= input.destination_position
            {
                task.position += 1;
            }
        }

        tracing::debug!(
            "Moving task {} from {}:{} to {}:{}",
            moved.id,
            input.source_column_id,
            original_position,
            input.destination_column_id,
            input.destination_position
        );

        moved.column_id = input.destination_column_id.clone();
        moved.position = input.destination_position;
        moved.touch();
        self.tasks.push(moved);

        self.persist();
        true
    }

    pub fn toggle_completion(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.find_mut(id) else {
            return false;
        };
        task.completed = !task.completed;
        task.touch();
        self.persist();
        true
    }

    /// Attach a tag. A tag whose id is already present is ignored.
    pub fn add_tag(&mut self, id: &TaskId, tag: Tag) -> DomainResult<bool> {
        let Some(task) = self.find_mut(id) else {
            return Ok(false);
        };
        if task.tags.iter().any(|t| t.id == tag.id) {
            return Ok(false);
        }
        if task.tags.len() >= MAX_TAGS_PER_TASK {
            return Err(DomainError::TagLimitExceeded {
                max: MAX_TAGS_PER_TASK,
            });
        }
        if task.has_tag_named(&tag.name) {
            return Err(DomainError::DuplicateTagName(tag.name));
        }

        task.tags.push(tag);
        task.touch();
        self.persist();
        Ok(true)
    }

    pub fn remove_tag(&mut self, id: &TaskId, tag_id: &TagId) -> bool {
        let Some(task) = self.find_mut(id) else {
            return false;
        };
        task.tags.retain(|t| &t.id != tag_id);
        task.touch();
        self.persist();
        true
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    fn persist(&self) {
        self.persistence.save_tasks(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryKeyValueStore;
    use crate::domain::{Priority, TAG_COLORS};
    use crate::ports::{MockKeyValueStore, StorageError};
    use proptest::prelude::*;

    fn empty_repo() -> TaskRepository {
        let persistence = Arc::new(Persistence::new(Box::new(MemoryKeyValueStore::new())));
        let mut repo = TaskRepository::new(persistence);
        repo.replace_all(Vec::new());
        repo
    }

    fn add(repo: &mut TaskRepository, title: &str, column: &str) -> TaskId {
        repo.add_task(NewTask::new(title, column)).unwrap()
    }

    fn order(repo: &TaskRepository, column: &str) -> Vec<(String, usize)> {
        repo.tasks_by_column(&column.into())
            .into_iter()
            .map(|t| (t.title.clone(), t.position))
            .collect()
    }

    fn move_to(repo: &mut TaskRepository, id: &TaskId, column: &str, position: usize) -> bool {
        let source = repo.get_task(id).map(|t| t.column_id.clone()).unwrap();
        repo.move_task(&MoveTask {
            task_id: id.clone(),
            source_column_id: source,
            destination_column_id: column.into(),
            destination_position: position,
        })
    }

    fn assert_dense(repo: &TaskRepository) {
        let mut columns: Vec<&ColumnId> = repo.tasks().iter().map(|t| &t.column_id).collect();
        columns.sort_by(|a, b| a.0.cmp(&b.0));
        columns.dedup();
        for column in columns {
            let positions: Vec<usize> = repo
                .tasks_by_column(column)
                .iter()
                .map(|t| t.position)
                .collect();
            let expected: Vec<usize> = (0..positions.len()).collect();
            assert_eq!(positions, expected, "column {column}");
        }
    }

    #[test]
    fn test_add_appends_to_column() {
        let mut repo = empty_repo();
        add(&mut repo, "A", "todo");
        add(&mut repo, "B", "todo");
        add(&mut repo, "X", "done");

        assert_eq!(
            order(&repo, "todo"),
            vec![("A".to_string(), 0), ("B".to_string(), 1)]
        );
        assert_eq!(order(&repo, "done"), vec![("X".to_string(), 0)]);

        let task = &repo.tasks()[0];
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert!(!task.blocked);
    }

    #[test]
    fn test_add_validates_input() {
        let mut repo = empty_repo();
        assert_eq!(
            repo.add_task(NewTask::new("   ", "todo")),
            Err(DomainError::EmptyTitle)
        );

        let mut input = NewTask::new("Too many tags", "todo");
        input.tags = (0..6).map(|i| Tag::new(&format!("t{i}"), TAG_COLORS[i])).collect();
        assert_eq!(
            repo.add_task(input),
            Err(DomainError::TagLimitExceeded { max: 5 })
        );
        assert!(repo.tasks().is_empty());
    }

    #[test]
    fn test_same_column_reorder_forward() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");
        add(&mut repo, "B", "todo");
        add(&mut repo, "C", "todo");

        assert!(move_to(&mut repo, &a, "todo", 2));

        assert_eq!(
            order(&repo, "todo"),
            vec![
                ("B".to_string(), 0),
                ("C".to_string(), 1),
                ("A".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_same_column_reorder_backward() {
        let mut repo = empty_repo();
        add(&mut repo, "A", "todo");
        add(&mut repo, "B", "todo");
        let c = add(&mut repo, "C", "todo");

        assert!(move_to(&mut repo, &c, "todo", 0));

        assert_eq!(
            order(&repo, "todo"),
            vec![
                ("C".to_string(), 0),
                ("A".to_string(), 1),
                ("B".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_cross_column_move() {
        let mut repo = empty_repo();
        add(&mut repo, "A", "todo");
        let b = add(&mut repo, "B", "todo");
        add(&mut repo, "X", "done");

        assert!(move_to(&mut repo, &b, "done", 0));

        assert_eq!(order(&repo, "todo"), vec![("A".to_string(), 0)]);
        assert_eq!(
            order(&repo, "done"),
            vec![("B".to_string(), 0), ("X".to_string(), 1)]
        );
        assert_eq!(repo.get_task(&b).unwrap().column_id.0, "done");
    }

    #[test]
    fn test_move_refreshes_updated_at() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");
        let before = repo.get_task(&a).unwrap().updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        move_to(&mut repo, &a, "done", 0);
        assert!(repo.get_task(&a).unwrap().updated_at > before);
    }

    #[test]
    fn test_move_unknown_task_is_noop() {
        let mut repo = empty_repo();
        add(&mut repo, "A", "todo");
        let moved = repo.move_task(&MoveTask {
            task_id: "ghost".into(),
            source_column_id: "todo".into(),
            destination_column_id: "done".into(),
            destination_position: 0,
        });
        assert!(!moved);
        assert_eq!(order(&repo, "todo"), vec![("A".to_string(), 0)]);
    }

    #[test]
    fn test_move_past_end_is_not_clamped() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");
        move_to(&mut repo, &a, "done", 7);
        assert_eq!(repo.get_task(&a).unwrap().position, 7);
    }

    #[test]
    fn test_delete_leaves_gap() {
        let mut repo = empty_repo();
        add(&mut repo, "A", "todo");
        let b = add(&mut repo, "B", "todo");
        add(&mut repo, "C", "todo");

        assert!(repo.delete_task(&b));
        assert!(!repo.delete_task(&b));
        assert_eq!(
            order(&repo, "todo"),
            vec![("A".to_string(), 0), ("C".to_string(), 2)]
        );
    }

    #[test]
    fn test_toggle_and_update() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");

        assert!(repo.toggle_completion(&a));
        assert!(repo.get_task(&a).unwrap().completed);
        assert!(repo.toggle_completion(&a));
        assert!(!repo.get_task(&a).unwrap().completed);
        assert!(!repo.toggle_completion(&"ghost".into()));

        let updated = repo
            .update_task(
                &a,
                TaskUpdate {
                    title: Some("  Renamed ".to_string()),
                    priority: Some(Priority::High),
                    blocked: Some(true),
                    description: Some(Some("details".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);
        let task = repo.get_task(&a).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, Priority::High);
        assert!(task.blocked);
        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.position, 0);

        assert_eq!(
            repo.update_task(&"ghost".into(), TaskUpdate::default()),
            Ok(false)
        );
    }

    #[test]
    fn test_tag_cap() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");
        for i in 0..5 {
            assert_eq!(
                repo.add_tag(&a, Tag::new(&format!("tag{i}"), TAG_COLORS[i])),
                Ok(true)
            );
        }

        let result = repo.add_tag(&a, Tag::new("sixth", TAG_COLORS[5]));
        assert_eq!(result, Err(DomainError::TagLimitExceeded { max: 5 }));
        assert_eq!(repo.get_task(&a).unwrap().tags.len(), 5);
    }

    #[test]
    fn test_tag_names_unique_and_ids_idempotent() {
        let mut repo = empty_repo();
        let a = add(&mut repo, "A", "todo");
        let bug = Tag::new("bug", "#ef4444");

        assert_eq!(repo.add_tag(&a, bug.clone()), Ok(true));
        assert_eq!(repo.add_tag(&a, bug.clone()), Ok(false));
        assert_eq!(
            repo.add_tag(&a, Tag::new("bug", "#3b82f6")),
            Err(DomainError::DuplicateTagName("bug".to_string()))
        );

        assert!(repo.remove_tag(&a, &bug.id));
        assert!(repo.get_task(&a).unwrap().tags.is_empty());
        assert!(!repo.remove_tag(&"ghost".into(), &bug.id));
    }

    #[test]
    fn test_mutations_are_persisted() {
        let persistence = Arc::new(Persistence::new(Box::new(MemoryKeyValueStore::new())));
        let mut repo = TaskRepository::new(persistence.clone());
        repo.replace_all(Vec::new());

        let a = add(&mut repo, "A", "todo");
        move_to(&mut repo, &a, "done", 0);

        let stored = persistence.load().tasks;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].column_id.0, "done");

        let mut reloaded = TaskRepository::new(persistence);
        reloaded.load();
        assert_eq!(reloaded.tasks(), repo.tasks());
    }

    #[test]
    fn test_not_found_does_not_write() {
        let mut store = MockKeyValueStore::new();
        store.expect_get_item().returning(|_| Ok(None));
        store.expect_set_item().never();
        store.expect_remove_item().never();

        let mut repo = TaskRepository::new(Arc::new(Persistence::new(Box::new(store))));
        assert!(!repo.delete_task(&"ghost".into()));
        assert!(!repo.toggle_completion(&"ghost".into()));
    }

    #[test]
    fn test_each_mutation_writes_synchronously() {
        let mut store = MockKeyValueStore::new();
        store.expect_get_item().returning(|_| Ok(None));
        // add + toggle, each writing both keys
        store.expect_set_item().times(4).returning(|_, _| Ok(()));

        let mut repo = TaskRepository::new(Arc::new(Persistence::new(Box::new(store))));
        let a = add(&mut repo, "A", "todo");
        repo.toggle_completion(&a);
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_change() {
        let mut store = MockKeyValueStore::new();
        store.expect_get_item().returning(|_| Ok(None));
        store
            .expect_set_item()
            .returning(|_, _| Err(StorageError::WriteError("quota exceeded".to_string())));

        let mut repo = TaskRepository::new(Arc::new(Persistence::new(Box::new(store))));
        let a = add(&mut repo, "A", "todo");
        assert!(repo.get_task(&a).is_some());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Move {
            task: usize,
            column: usize,
            slot: usize,
        },
    }

    const COLUMNS: [&str; 3] = ["todo", "doing", "done"];

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..COLUMNS.len()).prop_map(Op::Add),
            (0usize..64, 0..COLUMNS.len(), 0usize..64)
                .prop_map(|(task, column, slot)| Op::Move { task, column, slot }),
        ]
    }

    proptest! {
        #[test]
        fn prop_positions_stay_dense(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let mut repo = empty_repo();
            let mut ids: Vec<TaskId> = Vec::new();
            for op in ops {
                match op {
                    Op::Add(column) => {
                        ids.push(add(&mut repo, "task", COLUMNS[column]));
                    }
                    Op::Move { task, column, slot } => {
                        if ids.is_empty() {
                            continue;
                        }
                        let id = ids[task % ids.len()].clone();
                        let source = repo.get_task(&id).unwrap().column_id.clone();
                        let destination: ColumnId = COLUMNS[column].into();
                        // Valid slots are 0..=n where n excludes the moved task
                        let mut n = repo.count_in_column(&destination);
                        if destination == source {
                            n -= 1;
                        }
                        move_to(&mut repo, &id, COLUMNS[column], slot % (n + 1));
                    }
                }
            }
            assert_dense(&repo);
        }

        #[test]
        fn prop_move_to_current_slot_is_identity(
            count in 1usize..8,
            pick in 0usize..8,
        ) {
            let mut repo = empty_repo();
            let ids: Vec<TaskId> = (0..count).map(|i| add(&mut repo, &format!("t{i}"), "todo")).collect();
            let before = order(&repo, "todo");

            let id = &ids[pick % count];
            let position = repo.get_task(id).unwrap().position;
            move_to(&mut repo, id, "todo", position);

            prop_assert_eq!(order(&repo, "todo"), before);
        }
    }
}
