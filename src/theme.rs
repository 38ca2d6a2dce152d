use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::log_warn;

/// The two shell color schemes. Modules receive the active theme through
/// their `Themeable` hook so hidden panels stay consistent when shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Loads, persists and toggles the current theme (`theme.json`).
#[derive(Debug)]
pub struct ThemeManager {
    path: PathBuf,
    pub current: Theme,
}

impl ThemeManager {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let current = Self::load_theme(&path);
        Self { path, current }
    }

    /// Reads the persisted theme, falling back to light on any failure.
    fn load_theme(path: &Path) -> Theme {
        if !path.exists() {
            return Theme::Light;
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<ThemeFile>(&contents) {
                Ok(file) => file.theme,
                Err(e) => {
                    log_warn!("Ignoring malformed theme file {:?}: {}", path, e);
                    Theme::Light
                }
            },
            Err(e) => {
                log_warn!("Failed to read theme file {:?}: {}", path, e);
                Theme::Light
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&ThemeFile { theme: self.current })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Flips the theme and persists it. The caller is responsible for
    /// broadcasting the change to loaded modules.
    pub fn toggle(&mut self) -> Theme {
        self.current = match self.current {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        if let Err(e) = self.save() {
            log_warn!("Failed to persist theme: {}", e);
        }
        self.current
    }
}
