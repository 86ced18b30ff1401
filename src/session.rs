//! Session State
//!
//! Everything the event handlers share: the current settings, the preview
//! registry and the workspace root.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::preview::{PreviewRegistry, PreviewView};
use crate::settings::{apply_changes, PreviewSettings, SettingsDiff};

#[derive(Debug, Default)]
pub struct Session {
    pub settings: PreviewSettings,
    pub previews: PreviewRegistry,
    pub workspace_root: Option<PathBuf>,
}

/// Effects of a settings update on the previews
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionUpdate {
    pub diff: SettingsDiff,
    /// Previews removed because the preview mode changed
    pub closed: Vec<PreviewView>,
    /// Previews reloaded with the new settings
    pub refreshed: Vec<PreviewView>,
}

impl Session {
    pub fn new(settings: PreviewSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Apply configuration values and update the previews accordingly
    pub fn apply_settings(&mut self, values: &Map<String, Value>) -> SessionUpdate {
        let diff = apply_changes(&mut self.settings, values);
        let mut update = SessionUpdate::default();

        // Switching preview mode invalidates every existing preview.
        if diff.contains("singlePreview") {
            update.closed = self.previews.close_all();
        }

        if diff.notify {
            update.refreshed = self.previews.refresh_all(&self.settings);
        }

        update.diff = diff;
        update
    }

    /// Flip a boolean setting; returns its new value
    pub fn toggle_setting(&mut self, key: &str) -> Option<(bool, SessionUpdate)> {
        let enabled = !self.settings.flag(key)?;

        let mut values = Map::new();
        values.insert(key.to_string(), Value::Bool(enabled));
        Some((enabled, self.apply_settings(&values)))
    }
}
