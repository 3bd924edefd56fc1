use std::sync::Arc;

use super::Persistence;
use crate::domain::{AppSettings, Priority, SettingsUpdate};

pub struct SettingsRepository {
    settings: AppSettings,
    persistence: Arc<Persistence>,
}

impl SettingsRepository {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self {
            settings: AppSettings::default(),
            persistence,
        }
    }

    pub fn load(&mut self) {
        self.settings = self.persistence.load().settings;
    }

    pub fn replace(&mut self, settings: AppSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn update(&mut self, update: SettingsUpdate) {
        update.apply_to(&mut self.settings);
        self.persistence.save_settings(&self.settings);
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.settings.theme.toggled();
        self.update(SettingsUpdate {
            theme: Some(theme),
            ..Default::default()
        });
    }

    pub fn toggle_auto_save(&mut self) {
        let auto_save = !self.settings.auto_save;
        self.update(SettingsUpdate {
            auto_save: Some(auto_save),
            ..Default::default()
        });
    }

    pub fn toggle_show_completed_tasks(&mut self) {
        let show = !self.settings.show_completed_tasks;
        self.update(SettingsUpdate {
            show_completed_tasks: Some(show),
            ..Default::default()
        });
    }

    pub fn set_default_priority(&mut self, priority: Priority) {
        self.update(SettingsUpdate {
            default_priority: Some(priority),
            ..Default::default()
        });
    }
}
