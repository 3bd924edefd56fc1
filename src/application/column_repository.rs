use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use super::Persistence;
use crate::domain::{
    default_board, Board, BoardUpdate, Column, ColumnId, ColumnUpdate, DEFAULT_COLUMN_COLOR,
};

/// Owns the board and its columns. Deleting a column never touches the tasks
/// that referenced it.
pub struct ColumnRepository {
    board: Board,
    persistence: Arc<Persistence>,
}

impl ColumnRepository {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self {
            board: default_board(),
            persistence,
        }
    }

    pub fn load(&mut self) {
        self.board = self.persistence.load().board;
    }

    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn columns(&self) -> Vec<&Column> {
        self.board.sorted_columns()
    }

    pub fn get_column(&self, id: &ColumnId) -> Option<&Column> {
        self.board.columns.iter().find(|c| &c.id == id)
    }

    pub fn update_board(&mut self, update: BoardUpdate) {
        if let Some(title) = update.title {
            self.board.title = title;
        }
        self.persist();
    }

    pub fn add_column(&mut self, title: &str, color: Option<&str>) -> ColumnId {
        let column = Column {
            id: ColumnId::generate(),
            title: title.to_string(),
            position: self.board.columns.len(),
            color: Some(color.unwrap_or(DEFAULT_COLUMN_COLOR).to_string()),
        };
        let id = column.id.clone();
        tracing::debug!("Adding column {} at {}", id, column.position);

        self.board.columns.push(column);
        self.persist();
        id
    }

    pub fn update_column(&mut self, id: &ColumnId, update: ColumnUpdate) -> bool {
        let Some(column) = self.board.columns.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        if let Some(title) = update.title {
            column.title = title;
        }
        if let Some(color) = update.color {
            column.color = color;
        }
        self.persist();
        true
    }

    /// Remove a column and renumber the rest to `0..m-1`, keeping their order.
    pub fn delete_column(&mut self, id: &ColumnId) -> bool {
        let before = self.board.columns.len();
        self.board.columns.retain(|c| &c.id != id);
        if self.board.columns.len() == before {
            return false;
        }

        self.board.columns.sort_by_key(|c| c.position);
        for (index, column) in self.board.columns.iter_mut().enumerate() {
            column.position = index;
        }
        self.persist();
        true
    }

    /// Lay columns out in the order given. Unknown ids are ignored and repeated
    /// ids count once. Columns left out of `ordered_ids` are removed from the
    /// board; their ids are returned.
    pub fn reorder_columns(&mut self, ordered_ids: &[ColumnId]) -> Vec<ColumnId> {
        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(column) = self.get_column(id) {
                let mut column = column.clone();
                column.position = reordered.len();
                reordered.push(column);
            }
        }

        let dropped: Vec<ColumnId> = self
            .board
            .columns
            .iter()
            .filter(|c| !seen.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        if !dropped.is_empty() {
            tracing::warn!("Column reorder dropped {} column(s)", dropped.len());
        }

        self.board.columns = reordered;
        self.persist();
        dropped
    }

    fn persist(&mut self) {
        self.board.updated_at = Utc::now();
        self.persistence.save_board(&self.board);
    }
}
