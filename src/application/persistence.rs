//! Reads and writes the board snapshot through a [`KeyValueStore`].
//!
//! Board and tasks share one key; settings live under a second key. Reads
//! never fail: anything missing or unreadable yields the default snapshot.
//! Writes are best-effort and only logged on failure, so in-memory state can
//! run ahead of what is stored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AppError, AppResult};
use crate::domain::{default_app_data, default_board, AppData, AppSettings, Board, Task};
use crate::ports::KeyValueStore;

pub const DATA_KEY: &str = "taskflow-data";
pub const SETTINGS_KEY: &str = "taskflow-settings";

#[derive(Serialize)]
struct StoredDataRef<'a> {
    board: &'a Board,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct StoredData {
    #[serde(default)]
    board: Option<Board>,
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> AppData {
        match self.try_load() {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!("No stored board found, using defaults");
                default_app_data()
            }
            Err(e) => {
                tracing::error!("Error loading stored data, using defaults: {}", e);
                default_app_data()
            }
        }
    }

    fn try_load(&self) -> AppResult<Option<AppData>> {
        let stored_data = self.store.get_item(DATA_KEY)?;
        let stored_settings = self.store.get_item(SETTINGS_KEY)?;

        let (Some(stored_data), Some(stored_settings)) = (stored_data, stored_settings) else {
            return Ok(None);
        };

        let data: StoredData = serde_json::from_str(&stored_data)?;
        let settings: AppSettings = serde_json::from_str(&stored_settings)?;

        Ok(Some(AppData {
            board: data.board.unwrap_or_else(default_board),
            tasks: data.tasks.unwrap_or_default(),
            settings,
        }))
    }

    pub fn save(&self, data: &AppData) {
        if let Err(e) = self.try_save(data) {
            tracing::error!("Error saving data: {}", e);
        }
    }

    fn try_save(&self, data: &AppData) -> AppResult<()> {
        let stored = serde_json::to_string(&StoredDataRef {
            board: &data.board,
            tasks: &data.tasks,
        })?;
        let settings = serde_json::to_string(&data.settings)?;

        self.store.set_item(DATA_KEY, &stored)?;
        self.store.set_item(SETTINGS_KEY, &settings)?;
        Ok(())
    }

    pub fn save_tasks(&self, tasks: &[Task]) {
        let mut data = self.load();
        data.tasks = tasks.to_vec();
        self.save(&data);
    }

    pub fn save_board(&self, board: &Board) {
        let mut data = self.load();
        data.board = board.clone();
        self.save(&data);
    }

    pub fn save_settings(&self, settings: &AppSettings) {
        let mut data = self.load();
        data.settings = settings.clone();
        self.save(&data);
    }

    /// Pretty-printed `{board, tasks, settings}` of the stored snapshot.
    pub fn export_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.load())?)
    }

    /// Validate and store an exported snapshot. Nothing is written unless the
    /// whole document is accepted.
    pub fn import_json(&self, json: &str) -> AppResult<AppData> {
        let data = parse_import(json).map_err(|e| {
            tracing::error!("Error importing data: {}", e);
            AppError::InvalidImport(e)
        })?;

        self.save(&data);
        tracing::info!("Imported {} tasks", data.tasks.len());
        Ok(data)
    }

    pub fn clear(&self) {
        for key in [DATA_KEY, SETTINGS_KEY] {
            if let Err(e) = self.store.remove_item(key) {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }
    }
}

fn parse_import(json: &str) -> Result<AppData, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;

    let board_present = match value.get("board") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    };
    if !board_present || !value.get("tasks").is_some_and(Value::is_array) {
        return Err("Invalid data structure".to_string());
    }

    // Board and settings are merged field by field over defaults via
    // `#[serde(default)]` on both types.
    let mut object = value;
    if let Some(map) = object.as_object_mut() {
        if map.get("settings").is_some_and(Value::is_null) {
            map.remove("settings");
        }
    }
    serde_json::from_value(object).map_err(|e| e.to_string())
}
