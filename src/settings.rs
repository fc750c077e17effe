use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherSettings {
    /// When false, the hotkey reveals the launcher without attempting to
    /// capture the foreground selection.
    pub capture_enabled: bool,
    /// Default number of ranked snippets handed to the frontend.
    pub max_results: usize,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            capture_enabled: true,
            max_results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserSettings {
    launcher: LauncherSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            launcher: LauncherSettings::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn launcher(&self) -> LauncherSettings {
        self.data.read().unwrap().launcher.clone()
    }

    pub fn update_launcher(&self, settings: LauncherSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.launcher = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
