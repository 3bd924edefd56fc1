use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Task title is required")]
    EmptyTitle,

    #[error("Maximum {max} tags allowed")]
    TagLimitExceeded { max: usize },

    #[error("Tag already exists on task: {0}")]
    DuplicateTagName(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Position {position} is out of range (0..={max})")]
    PositionOutOfRange { position: usize, max: usize },
}

pub type DomainResult<T> = Result<T, DomainError>;
