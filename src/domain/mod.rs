pub mod app_data;
pub mod board;
pub mod column;
pub mod defaults;
pub mod error;
pub mod ordering;
pub mod settings;
pub mod task;

pub use app_data::*;
pub use board::*;
pub use column::*;
pub use defaults::*;
pub use error::*;
pub use ordering::*;
pub use settings::*;
pub use task::*;
