use serde::{Deserialize, Serialize};
use std::fmt;

use super::Priority;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// User preferences. Absent fields deserialize to their defaults, which gives
/// stored and imported settings a shallow merge over `AppSettings::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub auto_save: bool,
    pub show_completed_tasks: bool,
    pub default_priority: Priority,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            auto_save: true,
            show_completed_tasks: true,
            default_priority: Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub theme: Option<Theme>,
    pub auto_save: Option<bool>,
    pub show_completed_tasks: Option<bool>,
    pub default_priority: Option<Priority>,
}

impl SettingsUpdate {
    pub fn apply_to(self, settings: &mut AppSettings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(auto_save) = self.auto_save {
            settings.auto_save = auto_save;
        }
        if let Some(show) = self.show_completed_tasks {
            settings.show_completed_tasks = show;
        }
        if let Some(priority) = self.default_priority {
            settings.default_priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.auto_save);
        assert!(settings.show_completed_tasks);
        assert_eq!(settings.default_priority, Priority::Medium);
    }

    #[test]
    fn test_settings_update_only_touches_given_fields() {
        let mut settings = AppSettings::default();
        SettingsUpdate {
            show_completed_tasks: Some(false),
            ..Default::default()
        }
        .apply_to(&mut settings);
        assert!(!settings.show_completed_tasks);
        assert_eq!(settings.theme, Theme::Light);
    }
}
