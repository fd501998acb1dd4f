// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information shared by all module
//! instances. Intended to be serialized.

use crate::prelude::*;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contains persistent mixer-wide settings. Each module instance keeps its
/// own theme; this struct holds the theme that newly created instances start
/// with. The host owns one [MixerSettings] and hands it to modules at
/// creation time.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MixerSettings {
    default_theme: ColorTheme,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for MixerSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl MixerSettings {
    /// The theme that newly created module instances start with.
    pub fn default_theme(&self) -> ColorTheme {
        self.default_theme
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_default_theme(&mut self, theme: ColorTheme) {
        if theme != self.default_theme {
            self.default_theme = theme;
            self.needs_save();
        }
    }

    /// Reads settings from the given JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Couldn't read settings file {}", path.display()))?;
        let mut settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("Couldn't parse settings file {}", path.display()))?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Writes settings to the given JSON file.
    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Couldn't write settings file {}", path.display()))?;
        self.mark_clean();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_changes_mark_dirty() {
        let mut settings = MixerSettings::default();
        settings.mark_clean();
        settings.set_default_theme(ColorTheme::Cream);
        assert!(
            settings.has_been_saved(),
            "setting the same theme is not a change"
        );
        settings.set_default_theme(ColorTheme::Night);
        assert!(!settings.has_been_saved());
        assert_eq!(settings.default_theme(), ColorTheme::Night);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let mut settings = MixerSettings::default();
        settings.set_default_theme(ColorTheme::Night);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("default-theme"));
        let restored: MixerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.default_theme(), ColorTheme::Night);
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        assert!(MixerSettings::load(Path::new("/nonexistent/settings.json")).is_err());
    }
}
