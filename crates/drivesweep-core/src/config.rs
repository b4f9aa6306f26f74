/// Persistent user settings.
///
/// Stored as JSON at `%APPDATA%\DriveSweep\config.json`. Loading never
/// fails: a missing file yields defaults, a malformed one is logged and
/// replaced by defaults on the next save.
use crate::error::{DriveSweepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of files between two scan progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 500;

const CONFIG_DIR: &str = "DriveSweep";
const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "drivesweep.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Emit folder entries with aggregated sizes in addition to files.
    pub include_folders: bool,
    /// Files between two progress updates during a scan.
    pub progress_interval: u64,
    pub dark_mode: bool,
    /// Where CSV exports go. `None` writes next to the working directory.
    pub export_path: Option<PathBuf>,
    /// Log at DEBUG instead of INFO.
    pub verbose_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            include_folders: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            dark_mode: true,
            export_path: None,
            verbose_logging: false,
        }
    }
}

impl AppConfig {
    /// Location of the config file for the current user.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("APPDATA") {
            Some(appdata) => PathBuf::from(appdata).join(CONFIG_DIR).join(CONFIG_FILE),
            None => PathBuf::from(FALLBACK_CONFIG_FILE),
        }
    }

    /// Load from [`default_path`](Self::default_path).
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Could not read config {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&text) {
            Ok(config) => config.sanitised(),
            Err(source) => {
                let err = DriveSweepError::Config {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!("{err} -- using defaults");
                Self::default()
            }
        }
    }

    /// Save to [`default_path`](Self::default_path).
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DriveSweepError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| DriveSweepError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| DriveSweepError::io(path, e))
    }

    /// A zero interval would mean "report after every file"; clamp it.
    fn sanitised(mut self) -> Self {
        if self.progress_interval == 0 {
            self.progress_interval = DEFAULT_PROGRESS_INTERVAL;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load_from(&tmp.path().join("nope.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");

        let config = AppConfig {
            include_folders: true,
            progress_interval: 42,
            dark_mode: false,
            export_path: Some(PathBuf::from("out.csv")),
            verbose_logging: true,
        };
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "include_folders": true, "progress_interval": 0 }"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.include_folders);
        assert!(config.dark_mode);
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    }
}
