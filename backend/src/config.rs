//! # Planner Configuration
//!
//! Application settings stored as a single YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/home/me/Documents/Trip Planner"
//! base_currency: ZAR
//! home_destination: South Africa
//! autosave_delay_ms: 1500
//! log_level: info
//! ```
//!
//! Missing keys fall back to their defaults. A missing file is created with
//! the defaults on first load. `TRIP_PLANNER_DATA_DIR` overrides the data
//! directory without touching the file.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::CurrencyCode;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "TRIP_PLANNER_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Directory holding the CSV tables
    pub data_directory: PathBuf,
    /// Currency all budget totals are converted into
    pub base_currency: CurrencyCode,
    /// Origin point of the visited-destinations map
    pub home_destination: String,
    /// Quiet period before a note edit is written
    pub autosave_delay_ms: u64,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            base_currency: CurrencyCode::zar(),
            home_destination: "South Africa".to_string(),
            autosave_delay_ms: 1500,
            log_level: "info".to_string(),
        }
    }
}

/// `<Documents>/Trip Planner`, or `./trip-planner-data` without a Documents folder
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .map(|docs| docs.join("Trip Planner"))
        .unwrap_or_else(|| PathBuf::from("./trip-planner-data"))
}

impl PlannerConfig {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        default_data_directory().join(CONFIG_FILE_NAME)
    }

    /// Load from `path`, creating the file with defaults when missing, then
    /// apply the environment override
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::load_or_create(path)?;
        Ok(config.with_data_directory_override(std::env::var(DATA_DIR_ENV).ok()))
    }

    fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: PlannerConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            debug!("Loaded planner config from {:?}", path);
            Ok(config)
        } else {
            let config = PlannerConfig::default();
            config.save(path)?;
            info!("Created default planner config at {:?}", path);
            Ok(config)
        }
    }

    /// Write the config atomically (temp file, then rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved planner config to {:?}", path);
        Ok(())
    }

    /// Replace the data directory when an override is set and non-empty
    pub fn with_data_directory_override(mut self, data_directory: Option<String>) -> Self {
        if let Some(dir) = data_directory.filter(|dir| !dir.trim().is_empty()) {
            info!("Using data directory from {}: {}", DATA_DIR_ENV, dir);
            self.data_directory = PathBuf::from(dir);
        }
        self
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = PlannerConfig::load_or_create(&path).unwrap();

        assert_eq!(config, PlannerConfig::default());
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(PlannerConfig::load_or_create(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "base_currency: usd\nautosave_delay_ms: 250\n").unwrap();

        let config = PlannerConfig::load_or_create(&path).unwrap();

        assert_eq!(config.base_currency, CurrencyCode::usd());
        assert_eq!(config.autosave_delay(), Duration::from_millis(250));
        assert_eq!(config.home_destination, "South Africa");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "autosave_delay_ms: [not, a, number]\n").unwrap();

        assert!(PlannerConfig::load_or_create(&path).is_err());
    }

    #[test]
    fn test_data_directory_override() {
        let config = PlannerConfig::default();

        let overridden = config.clone().with_data_directory_override(Some("/srv/trips".to_string()));
        assert_eq!(overridden.data_directory, PathBuf::from("/srv/trips"));

        let untouched = config.clone().with_data_directory_override(Some("  ".to_string()));
        assert_eq!(untouched.data_directory, config.data_directory);
    }
}
