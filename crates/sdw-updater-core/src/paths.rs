use crate::error::{Result, UpdaterError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// dom0, relative to the user's home directory
// ---------------------------------------------------------------------------

pub const LAUNCHER_DIR: &str = ".securedrop_launcher";
pub const STATUS_FLAG_FILE: &str = ".securedrop_launcher/sdw-update-status";
pub const LAST_UPDATED_FLAG_FILE: &str = ".securedrop_launcher/sdw-last-updated";
pub const CONFIG_FILE: &str = ".securedrop_launcher/updater.yaml";
pub const LOG_DIR: &str = ".securedrop_launcher/logs";
pub const LOG_FILE_NAME: &str = "launcher.log";

// ---------------------------------------------------------------------------
// Inside the sensitive cell (absolute)
// ---------------------------------------------------------------------------

pub const CELL_STATUS_FLAG: &str = "/home/user/.securedrop_client/sdw-update-status";
pub const CELL_LAST_UPDATED_FLAG: &str = "/home/user/.securedrop_client/sdw-last-updated";

/// Format of the last-updated flag, always UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn launcher_dir(home: &Path) -> PathBuf {
    home.join(LAUNCHER_DIR)
}

pub fn status_flag_path(home: &Path) -> PathBuf {
    home.join(STATUS_FLAG_FILE)
}

pub fn last_updated_flag_path(home: &Path) -> PathBuf {
    home.join(LAST_UPDATED_FLAG_FILE)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn log_dir(home: &Path) -> PathBuf {
    home.join(LOG_DIR)
}

/// Resolve the dom0 home directory: explicit override first, then `$HOME`.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    home::home_dir().ok_or(UpdaterError::HomeNotFound)
}
