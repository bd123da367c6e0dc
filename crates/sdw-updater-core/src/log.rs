use crate::error::UpdaterError;

/// Destination for the engine's human-readable log lines.
pub trait LogSink {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards engine log lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Context line first, raw diagnostic second, as two separate entries.
/// Any captured command output is carried in the second entry.
pub(crate) fn log_failure(log: &dyn LogSink, context: &str, err: &UpdaterError) {
    log.error(context);
    log.error(&err.diagnostic());
}
