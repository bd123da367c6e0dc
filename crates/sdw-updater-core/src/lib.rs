//! Update orchestration engine for the SecureDrop Workstation fleet.
//!
//! The engine checks every target in the static registry, applies updates on
//! request, restarts the service cells in dependency order and persists the
//! aggregated status for the monitoring side. Everything runs sequentially
//! through a [`CommandChannel`]; nothing here talks to Qubes directly.

pub mod apply;
pub mod channel;
pub mod check;
pub mod config;
pub mod error;
pub mod io;
pub mod lifecycle;
pub mod log;
pub mod paths;
pub mod persist;
pub mod status;
pub mod targets;
pub mod updater;

#[cfg(test)]
pub(crate) mod testing;

pub use apply::ApplyOutcome;
pub use channel::{CommandChannel, QubesChannel};
pub use error::{Result, UpdaterError};
pub use log::{LogSink, TracingLog};
pub use status::{overall_status, ResultSet, UpdateStatus};
pub use targets::{Target, TargetKind};
pub use updater::Updater;
