pub mod board_manager;
pub mod column_repository;
pub mod drag;
pub mod error;
pub mod persistence;
pub mod settings_repository;
pub mod task_repository;

pub use board_manager::*;
pub use column_repository::*;
pub use drag::*;
pub use error::*;
pub use persistence::*;
pub use settings_repository::*;
pub use task_repository::*;
