//! Applying updates, followed by the fleet restart and flag writes.

use crate::channel;
use crate::error::{Result, UpdaterError};
use crate::log::log_failure;
use crate::status::{ResultSet, UpdateStatus};
use crate::targets::{self, Target, TargetKind};
use crate::updater::Updater;
use serde::Serialize;

/// Result of [`Updater::apply_updates`].
///
/// A request for dom0 alone yields a bare status; anything else yields a
/// per-target result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApplyOutcome {
    Single(UpdateStatus),
    Fleet(ResultSet),
}

impl ApplyOutcome {
    pub fn overall(&self) -> UpdateStatus {
        match self {
            ApplyOutcome::Single(status) => *status,
            ApplyOutcome::Fleet(results) => results.overall(),
        }
    }
}

impl Updater<'_> {
    /// Apply updates to the named targets, restart the service cells and
    /// persist the outcome.
    ///
    /// Every name is resolved before any command runs. Duplicates are applied
    /// once.
    pub fn apply_updates<S: AsRef<str>>(&self, names: &[S]) -> Result<ApplyOutcome> {
        if names.is_empty() {
            return Err(UpdaterError::NoTargets);
        }
        let mut requested: Vec<&'static Target> = Vec::with_capacity(names.len());
        for name in names {
            let target = targets::lookup(name.as_ref())?;
            if !requested.iter().any(|t| t.name == target.name) {
                requested.push(target);
            }
        }

        self.log.info("Applying all updates");
        let outcome = match requested.as_slice() {
            [only] if only.is_control_domain() => {
                ApplyOutcome::Single(self.apply_control_domain())
            }
            _ => ApplyOutcome::Fleet(
                requested
                    .iter()
                    .map(|t| (t.name, self.apply_target(t)))
                    .collect(),
            ),
        };

        self.shutdown_and_restart_fleet();
        self.write_last_updated_flags();
        self.write_status_flag(outcome.overall());
        Ok(outcome)
    }

    fn apply_target(&self, target: &Target) -> UpdateStatus {
        match target.kind {
            TargetKind::ControlDomain => self.apply_control_domain(),
            TargetKind::FedoraTemplate | TargetKind::DebianTemplate => self.apply_template(target),
        }
    }

    /// dom0 updates always assume a reboot is needed.
    fn apply_control_domain(&self) -> UpdateStatus {
        self.log.info("Updating dom0");
        if let Err(e) = self.channel.invoke(&channel::dom0_apply()) {
            log_failure(
                self.log,
                "An error has occurred updating dom0. Please contact your administrator.",
                &e,
            );
            return UpdateStatus::UpdatesFailed;
        }
        self.log.info("dom0 update successful");
        UpdateStatus::RebootRequired
    }

    fn apply_template(&self, target: &Target) -> UpdateStatus {
        self.log
            .info(&format!("Updating {}:{}", target.name, target.template));
        if let Err(e) = self
            .channel
            .invoke(&channel::qubesctl_update(target.template))
        {
            log_failure(
                self.log,
                &format!(
                    "An error has occurred updating {}. Please contact your administrator.",
                    target.template
                ),
                &e,
            );
            return UpdateStatus::UpdatesFailed;
        }
        self.log
            .info(&format!("{} update successful", target.template));
        match target.kind {
            TargetKind::FedoraTemplate => UpdateStatus::RebootRequired,
            _ => UpdateStatus::UpdatesOk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{dom0_apply, qubesctl_update};
    use crate::lifecycle::RESTART_ORDER;
    use crate::paths;
    use crate::testing::{argv, RecordingLog, ScriptedChannel};
    use tempfile::TempDir;

    fn restart_count(calls: &[Vec<String>]) -> usize {
        calls
            .iter()
            .filter(|c| *c == &argv(&["qvm-shutdown", "--wait", RESTART_ORDER[0]]))
            .count()
    }

    #[test]
    fn dom0_alone_returns_bare_status() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["dom0"]).unwrap();
        assert_eq!(outcome, ApplyOutcome::Single(UpdateStatus::RebootRequired));
        assert_eq!(outcome.overall(), UpdateStatus::RebootRequired);

        let calls = channel.calls();
        assert_eq!(calls[0], argv(&["sudo", "qubes-dom0-update", "-y"]));
        assert!(!calls.iter().any(|c| c.get(1).map(String::as_str) == Some("qubesctl")));
        assert_eq!(restart_count(&calls), 1);
        assert!(log.errors().is_empty());
        assert_eq!(
            std::fs::read_to_string(paths::status_flag_path(dir.path())).unwrap(),
            "2"
        );
        assert!(paths::last_updated_flag_path(dir.path()).exists());
    }

    #[test]
    fn flags_are_written_after_restart_last_updated_first() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        updater.apply_updates(&["sd-log"]).unwrap();

        let calls = channel.calls();
        let position = |pred: &dyn Fn(&Vec<String>) -> bool| {
            calls.iter().position(pred).expect("call not made")
        };
        let cell_write = |flag: &'static str| {
            move |c: &Vec<String>| {
                c.len() == 3
                    && c[0] == "qvm-run"
                    && c[1] == "sd-svs"
                    && c[2].starts_with("echo '")
                    && c[2].ends_with(flag)
            }
        };
        let last_start = position(&|c| *c == argv(&["qvm-start", "sd-gpg"]));
        let last_updated = position(&cell_write(paths::CELL_LAST_UPDATED_FLAG));
        let status = position(&cell_write(paths::CELL_STATUS_FLAG));

        assert!(last_start < last_updated, "last-updated written before restart finished");
        assert!(last_updated < status, "status written before last-updated");
        assert_eq!(status, calls.len() - 1);
        assert_eq!(
            calls[status][2],
            format!("echo '0' > {}", paths::CELL_STATUS_FLAG)
        );
        assert!(paths::last_updated_flag_path(dir.path()).exists());
        assert!(crate::persist::read_last_updated(dir.path())
            .unwrap()
            .is_some());
    }

    #[test]
    fn dom0_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::with_script(&[false]);
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["dom0"]).unwrap();
        assert_eq!(outcome, ApplyOutcome::Single(UpdateStatus::UpdatesFailed));
        assert_eq!(
            log.errors()[0],
            "An error has occurred updating dom0. Please contact your administrator."
        );
    }

    #[test]
    fn cells_return_result_set_and_restart_once() {
        let dir = TempDir::new().unwrap();
        let channel =
            ScriptedChannel::new().failing(qubesctl_update("sd-svs-buster-template"));
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["fedora", "sd-svs"]).unwrap();
        let expected: ResultSet = [
            ("fedora", UpdateStatus::RebootRequired),
            ("sd-svs", UpdateStatus::UpdatesFailed),
        ]
        .into_iter()
        .collect();
        assert_eq!(outcome, ApplyOutcome::Fleet(expected));
        assert_eq!(outcome.overall(), UpdateStatus::UpdatesFailed);

        let calls = channel.calls();
        assert_eq!(calls[0], qubesctl_update("fedora-30"));
        assert_eq!(calls[1], qubesctl_update("sd-svs-buster-template"));
        assert_eq!(restart_count(&calls), 1);
        assert_eq!(
            log.errors()[0],
            "An error has occurred updating sd-svs-buster-template. Please contact your administrator."
        );
        assert_eq!(
            std::fs::read_to_string(paths::status_flag_path(dir.path())).unwrap(),
            "3"
        );
        assert!(paths::last_updated_flag_path(dir.path()).exists());
    }

    #[test]
    fn debian_templates_need_no_reboot() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["sd-log", "sd-gpg"]).unwrap();
        assert_eq!(outcome.overall(), UpdateStatus::UpdatesOk);
        assert_eq!(
            log.infos()[..3],
            [
                "Applying all updates".to_string(),
                "Updating sd-log:sd-log-buster-template".to_string(),
                "sd-log-buster-template update successful".to_string(),
            ]
        );
    }

    #[test]
    fn dom0_in_a_batch_uses_dom0_procedure() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["dom0", "sd-proxy"]).unwrap();
        match outcome {
            ApplyOutcome::Fleet(results) => {
                assert_eq!(results.get("dom0"), Some(UpdateStatus::RebootRequired));
                assert_eq!(results.get("sd-proxy"), Some(UpdateStatus::UpdatesOk));
            }
            other => panic!("expected fleet outcome, got {other:?}"),
        }
        assert_eq!(channel.calls()[0], dom0_apply());
    }

    #[test]
    fn duplicates_are_applied_once() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let outcome = updater.apply_updates(&["sd-log", "sd-log"]).unwrap();
        match outcome {
            ApplyOutcome::Fleet(results) => assert_eq!(results.len(), 1),
            other => panic!("expected fleet outcome, got {other:?}"),
        }
        let applies = channel
            .calls()
            .iter()
            .filter(|c| **c == qubesctl_update("sd-log-buster-template"))
            .count();
        assert_eq!(applies, 1);
    }

    #[test]
    fn unknown_name_aborts_before_any_command() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let err = updater.apply_updates(&["sd-svs", "sys-whonix"]).unwrap_err();
        assert!(matches!(err, UpdaterError::UnknownTarget(ref n) if n == "sys-whonix"));
        assert!(channel.calls().is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn empty_request_is_rejected() {
        let dir = TempDir::new().unwrap();
        let channel = ScriptedChannel::new();
        let log = RecordingLog::new();
        let updater = Updater::new(&channel, &log, dir.path());

        let none: [&str; 0] = [];
        assert!(matches!(
            updater.apply_updates(&none),
            Err(UpdaterError::NoTargets)
        ));
        assert!(channel.calls().is_empty());
    }

    #[test]
    fn outcome_serializes_untagged() {
        let single = serde_yaml::to_string(&ApplyOutcome::Single(UpdateStatus::UpdatesOk)).unwrap();
        assert_eq!(single.trim(), "UPDATES_OK");
        let fleet: ResultSet = [("fedora", UpdateStatus::RebootRequired)].into_iter().collect();
        let fleet = serde_yaml::to_string(&ApplyOutcome::Fleet(fleet)).unwrap();
        assert_eq!(fleet.trim(), "fedora: REBOOT_REQUIRED");
    }
}
