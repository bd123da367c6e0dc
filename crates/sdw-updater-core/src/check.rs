//! Read-only update checks, one procedure per target kind.
//!
//! Checks never fail the pipeline: every command failure becomes a status.
//! The only error returned is an unknown target name.

use crate::channel::{self, APT_REFRESH, APT_NOTHING_UPGRADABLE, DNF_CHECK_UPDATE};
use crate::error::Result;
use crate::log::log_failure;
use crate::status::{ResultSet, UpdateStatus};
use crate::targets::{self, Target, TargetKind};
use crate::updater::Updater;

impl Updater<'_> {
    pub fn check_updates(&self, name: &str) -> Result<UpdateStatus> {
        let target = targets::lookup(name)?;
        Ok(match target.kind {
            TargetKind::ControlDomain => self.check_control_domain(target),
            TargetKind::FedoraTemplate => self.check_fedora(target),
            TargetKind::DebianTemplate => self.check_debian(target),
        })
    }

    /// Check every registered target in order, then persist the verdict.
    pub fn check_all_updates(&self) -> Result<ResultSet> {
        let mut results = ResultSet::new();
        for target in targets::all() {
            results.insert(target.name, self.check_updates(target.name)?);
        }
        self.write_status_flag(results.overall());
        self.write_last_updated_flags();
        Ok(results)
    }

    fn check_control_domain(&self, target: &Target) -> UpdateStatus {
        match self.channel.invoke(&channel::dom0_check_only()) {
            Ok(()) => {
                self.log.info(&format!("{} is up to date", target.name));
                UpdateStatus::UpdatesOk
            }
            Err(e) => {
                log_failure(
                    self.log,
                    &format!("{} updates required or cannot check for updates", target.name),
                    &e,
                );
                UpdateStatus::UpdatesRequired
            }
        }
    }

    fn check_fedora(&self, target: &Target) -> UpdateStatus {
        // dnf exits 100 when updates are available.
        let query = self
            .channel
            .invoke(&channel::qvm_run(target.template, DNF_CHECK_UPDATE));
        self.finish_template_check(target, query)
    }

    fn check_debian(&self, target: &Target) -> UpdateStatus {
        self.log.info(&format!(
            "Checking for updates {}:{}",
            target.name, target.template
        ));
        let query = self
            .channel
            .invoke(&channel::qvm_run(target.template, APT_REFRESH))
            .and_then(|()| {
                self.channel
                    .invoke(&channel::qvm_run(target.template, APT_NOTHING_UPGRADABLE))
            });
        self.finish_template_check(target, query)
    }

    /// Log the query result, then always shut the template back down.
    /// A template left running is reported as FAILED.
    fn finish_template_check(&self, target: &Target, query: Result<()>) -> UpdateStatus {
        let updates_required = match query {
            Ok(()) => false,
            Err(e) => {
                log_failure(
                    self.log,
                    &format!(
                        "Updates required for {} or cannot check for updates",
                        target.template
                    ),
                    &e,
                );
                true
            }
        };

        if let Err(e) = self
            .channel
            .invoke(&channel::qvm_shutdown(target.template, false))
        {
            log_failure(
                self.log,
                &format!("Failed to shut down {}", target.template),
                &e,
            );
            return UpdateStatus::UpdatesFailed;
        }

        if updates_required {
            UpdateStatus::UpdatesRequired
        } else {
            self.log.info(&format!("{} is up to date", target.template));
            UpdateStatus::UpdatesOk
        }
    }
}
