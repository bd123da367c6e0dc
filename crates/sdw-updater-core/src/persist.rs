//! Best-effort status flags for the monitoring side.
//!
//! Each value is written twice: into the sensitive cell over the command
//! channel, then into dom0's home directory. The two writes are independent;
//! a failure in one is logged and never stops the other or reaches the caller.

use crate::channel;
use crate::error::{Result, UpdaterError};
use crate::io;
use crate::log::log_failure;
use crate::paths::{self, CELL_LAST_UPDATED_FLAG, CELL_STATUS_FLAG, DATE_FORMAT};
use crate::status::UpdateStatus;
use crate::targets::{CONTROL_DOMAIN, SENSITIVE_CELL};
use crate::updater::Updater;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;

impl Updater<'_> {
    pub fn write_status_flag(&self, status: UpdateStatus) {
        let value = status.as_value();

        self.log
            .info(&format!("Setting update flag to {value} in {SENSITIVE_CELL}"));
        if let Err(e) = self.write_cell_flag(CELL_STATUS_FLAG, value) {
            log_failure(
                self.log,
                &format!("Error writing update status flag to {SENSITIVE_CELL}"),
                &e,
            );
        }

        self.log
            .info(&format!("Setting update flag to {value} in {CONTROL_DOMAIN}"));
        if let Err(e) = io::atomic_write(&paths::status_flag_path(&self.home), value.as_bytes()) {
            log_failure(
                self.log,
                &format!("Error writing update status flag to {CONTROL_DOMAIN}"),
                &e,
            );
        }
    }

    pub fn write_last_updated_flags(&self) {
        self.write_last_updated_flags_at(Utc::now());
    }

    /// Same as [`write_last_updated_flags`](Self::write_last_updated_flags)
    /// with an explicit timestamp. One value is formatted and used for both writes.
    pub fn write_last_updated_flags_at(&self, now: DateTime<Utc>) {
        let stamp = now.format(DATE_FORMAT).to_string();

        self.log
            .info(&format!("Setting last updated to {stamp} in {SENSITIVE_CELL}"));
        if let Err(e) = self.write_cell_flag(CELL_LAST_UPDATED_FLAG, &stamp) {
            log_failure(
                self.log,
                &format!("Error writing last updated flag to {SENSITIVE_CELL}"),
                &e,
            );
        }

        self.log
            .info(&format!("Setting last updated to {stamp} in {CONTROL_DOMAIN}"));
        if let Err(e) =
            io::atomic_write(&paths::last_updated_flag_path(&self.home), stamp.as_bytes())
        {
            log_failure(
                self.log,
                &format!("Error writing last updated flag to {CONTROL_DOMAIN}"),
                &e,
            );
        }
    }

    fn write_cell_flag(&self, path: &str, value: &str) -> Result<()> {
        self.channel.invoke(&channel::qvm_run(
            SENSITIVE_CELL,
            &format!("echo '{value}' > {path}"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Read-back
// ---------------------------------------------------------------------------

/// Last persisted fleet status in dom0, if any.
pub fn read_status_flag(home: &Path) -> Result<Option<UpdateStatus>> {
    io::read_flag(&paths::status_flag_path(home))?
        .map(|v| v.parse::<UpdateStatus>())
        .transpose()
}

/// Last persisted update time in dom0, if any.
pub fn read_last_updated(home: &Path) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = io::read_flag(&paths::last_updated_flag_path(home))? else {
        return Ok(None);
    };
    NaiveDateTime::parse_from_str(&raw, DATE_FORMAT)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| UpdaterError::InvalidTimestamp(raw))
}
