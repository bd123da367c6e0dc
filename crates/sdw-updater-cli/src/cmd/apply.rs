use crate::output::{print_json, print_results};
use anyhow::Context;
use sdw_updater_core::{
    targets, ApplyOutcome, QubesChannel, ResultSet, TracingLog, UpdateStatus, Updater,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ApplyOutput<'a> {
    results: &'a ApplyOutcome,
    overall: UpdateStatus,
}

/// Targets to apply when none are named: every template-backed cell.
pub fn default_targets() -> Vec<String> {
    targets::cells().map(|t| t.name.to_string()).collect()
}

/// `sdw-update apply [TARGET...]` — apply updates, restart the service cells
/// and record the verdict.
pub fn run(home: &Path, requested: &[String], json: bool) -> anyhow::Result<()> {
    let names = if requested.is_empty() {
        default_targets()
    } else {
        requested.to_vec()
    };

    let channel = QubesChannel::new();
    let log = TracingLog;
    let updater = Updater::new(&channel, &log, home);

    let outcome = updater
        .apply_updates(names.as_slice())
        .context("failed to apply updates")?;

    if json {
        return print_json(&ApplyOutput {
            results: &outcome,
            overall: outcome.overall(),
        });
    }

    match &outcome {
        ApplyOutcome::Single(status) => {
            let mut results = ResultSet::new();
            results.insert(targets::CONTROL_DOMAIN, *status);
            print_results(&results);
        }
        ApplyOutcome::Fleet(results) => print_results(results),
    }
    Ok(())
}
