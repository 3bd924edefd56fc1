pub mod app;
pub mod event;
pub mod widgets;

pub use app::{run_tui, App};
