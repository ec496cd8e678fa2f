use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CONFIG_FILE: &str = "config.json";

/// Persisted application settings, rewritten in full on every change.
/// A missing or corrupt file falls back to defaults instead of failing
/// startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Last used workbook. `None` until the user picks one.
    pub workbook_path: Option<PathBuf>,
    pub theme: Option<String>,
}

impl AppConfig {
    pub fn load(dir: &Path) -> AppConfig {
        let path = dir.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Config at {path:?} is corrupt, falling back to defaults: {e}");
                AppConfig::default()
            }),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Couldn't read config at {path:?}: {e}");
                }
                AppConfig::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(CONFIG_FILE), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{AppConfig, CONFIG_FILE};

    #[test]
    fn round_trips_through_disk() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig {
            workbook_path: Some(PathBuf::from("/tmp/book.xlsx")),
            theme: None,
        };

        config.save(dir.path())?;

        assert_eq!(AppConfig::load(dir.path()), config);
        Ok(())
    }

    #[test]
    fn missing_file_loads_defaults() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(AppConfig::load(dir.path()), AppConfig::default());
        Ok(())
    }

    #[test]
    fn corrupt_file_loads_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(CONFIG_FILE), "{not json")?;

        assert_eq!(AppConfig::load(dir.path()), AppConfig::default());
        Ok(())
    }

    #[test]
    fn unknown_keys_are_ignored() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"workbook_path": "/tmp/book.xlsx", "window_geometry": "440x300"}"#,
        )?;

        let config = AppConfig::load(dir.path());
        assert_eq!(config.workbook_path, Some(PathBuf::from("/tmp/book.xlsx")));
        Ok(())
    }
}
