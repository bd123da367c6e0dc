use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Operator settings for the updater, read from `~/.securedrop_launcher/updater.yaml`.
///
/// Fleet composition, command lines, flag locations and restart order are
/// fixed and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// `tracing` filter directive, e.g. `info` or `sdw_updater_core=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write logs to `~/.securedrop_launcher/logs/launcher.log`.
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_to_file: default_log_to_file(),
        }
    }
}

impl UpdaterConfig {
    /// Load from `home`; a missing file yields the defaults.
    pub fn load(home: &Path) -> Result<Self> {
        let path = paths::config_path(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: UpdaterConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::config_path(home), data.as_bytes())
    }
}
