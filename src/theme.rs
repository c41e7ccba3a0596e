//! Dark-mode preference, the only state that survives a session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub const THEME_FILE: &str = "theme.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    pub is_dark_mode: bool,
}

impl ThemePreference {
    pub fn path_in(state_dir: &Path) -> PathBuf {
        state_dir.join(THEME_FILE)
    }

    /// Loads the preference, falling back to light mode when no file exists.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let preference: Self = serde_json::from_str(&content)?;
            debug!(dark = preference.is_dark_mode, "theme preference loaded");
            Ok(preference)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn toggle(&mut self) -> bool {
        self.is_dark_mode = !self.is_dark_mode;
        self.is_dark_mode
    }

    pub fn set(&mut self, dark: bool) {
        self.is_dark_mode = dark;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_light_mode() {
        let dir = tempfile::tempdir().unwrap();
        let preference = ThemePreference::load(&ThemePreference::path_in(dir.path())).unwrap();
        assert!(!preference.is_dark_mode);
    }

    #[test]
    fn toggled_preference_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = ThemePreference::path_in(&dir.path().join("nested"));

        let mut preference = ThemePreference::default();
        assert!(preference.toggle());
        preference.save(&path).unwrap();

        let reloaded = ThemePreference::load(&path).unwrap();
        assert!(reloaded.is_dark_mode);
    }

    #[test]
    fn set_overrides_current_value() {
        let mut preference = ThemePreference { is_dark_mode: true };
        preference.set(false);
        assert!(!preference.is_dark_mode);
        assert!(preference.toggle());
    }
}
