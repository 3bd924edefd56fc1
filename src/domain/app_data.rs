use serde::{Deserialize, Serialize};

use super::{AppSettings, Board, Task};

/// Full snapshot of the board, its tasks and the user settings.
/// Field order is the export key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    pub board: Board,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: AppSettings,
}
