//! Ordered shutdown and restart of the service cells after an update.

use crate::channel;
use crate::log::log_failure;
use crate::updater::Updater;
use std::fmt;

/// Cells restarted after every apply, in this exact order. Later cells depend
/// on services provided by earlier ones.
pub const RESTART_ORDER: [&str; 4] = ["sd-proxy", "sd-whonix", "sd-svs", "sd-gpg"];

/// Where a cell is in the reboot cycle:
/// `Running -> ShuttingDown -> Stopped -> Starting -> Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Running,
    ShuttingDown,
    Stopped,
    Starting,
}

impl CellState {
    pub fn as_str(self) -> &'static str {
        match self {
            CellState::Running => "running",
            CellState::ShuttingDown => "shutting_down",
            CellState::Stopped => "stopped",
            CellState::Starting => "starting",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Updater<'_> {
    /// Shut `cell` down, waiting for it to halt, then start it again.
    ///
    /// Failures are logged and swallowed. Returns the last state the cell is
    /// known to have reached: `ShuttingDown` if the shutdown failed, `Starting`
    /// if the start failed, `Running` on success.
    pub fn safe_reboot(&self, cell: &str) -> CellState {
        tracing::debug!(cell, state = %CellState::ShuttingDown, "reboot");
        if let Err(e) = self.channel.invoke(&channel::qvm_shutdown(cell, true)) {
            log_failure(self.log, &format!("Error while rebooting {cell}"), &e);
            return CellState::ShuttingDown;
        }

        tracing::debug!(cell, state = %CellState::Stopped, "reboot");
        if let Err(e) = self.channel.invoke(&channel::qvm_start(cell)) {
            log_failure(self.log, &format!("Error while rebooting {cell}"), &e);
            return CellState::Starting;
        }
        CellState::Running
    }

    /// Reboot the service cells in [`RESTART_ORDER`], one after another.
    /// Templates are never restarted here.
    pub fn shutdown_and_restart_fleet(&self) {
        self.log.info("Rebooting all vms for updates");
        for cell in RESTART_ORDER {
            self.safe_reboot(cell);
        }
    }
}
