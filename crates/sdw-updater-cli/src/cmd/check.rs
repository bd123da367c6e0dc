use crate::output::{print_json, print_results};
use anyhow::Context;
use sdw_updater_core::{QubesChannel, ResultSet, TracingLog, UpdateStatus, Updater};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckOutput<'a> {
    results: &'a ResultSet,
    overall: UpdateStatus,
}

/// `sdw-update check` — check every target and record the verdict.
pub fn run(home: &Path, json: bool) -> anyhow::Result<()> {
    let channel = QubesChannel::new();
    let log = TracingLog;
    let updater = Updater::new(&channel, &log, home);

    let results = updater
        .check_all_updates()
        .context("update check failed")?;

    if json {
        print_json(&CheckOutput {
            results: &results,
            overall: results.overall(),
        })
    } else {
        print_results(&results);
        Ok(())
    }
}
