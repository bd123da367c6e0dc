use crate::channel::CommandChannel;
use crate::log::LogSink;
use std::path::PathBuf;

/// Entry point to the engine: check, apply, restart and persist.
///
/// Holds no state between calls beyond its collaborators. The operations live
/// in `check`, `apply`, `lifecycle` and `persist`.
pub struct Updater<'a> {
    pub(crate) channel: &'a dyn CommandChannel,
    pub(crate) log: &'a dyn LogSink,
    pub(crate) home: PathBuf,
}

impl<'a> Updater<'a> {
    /// `home` is the dom0 user's home directory, where local flags are kept.
    pub fn new(
        channel: &'a dyn CommandChannel,
        log: &'a dyn LogSink,
        home: impl Into<PathBuf>,
    ) -> Self {
        Self {
            channel,
            log,
            home: home.into(),
        }
    }
}
