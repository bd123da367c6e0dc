use anyhow::Context;
use sdw_updater_core::{config::UpdaterConfig, paths};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: stderr always, plus the launcher log file
/// when `to_file` is set and the config allows it.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
pub fn init(
    home: &Path,
    config: &UpdaterConfig,
    to_file: bool,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log_level '{}'", config.log_level))?;

    let (file_layer, guard) = if to_file && config.log_to_file {
        let dir = paths::log_dir(home);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let appender = tracing_appender::rolling::never(&dir, paths::LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
