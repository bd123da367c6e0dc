use crate::output::print_json;
use anyhow::Context;
use sdw_updater_core::{paths::DATE_FORMAT, persist, UpdateStatus};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusOutput {
    status: Option<UpdateStatus>,
    last_updated: Option<String>,
}

/// `sdw-update status` — show what the last run recorded in dom0.
pub fn run(home: &Path, json: bool) -> anyhow::Result<()> {
    let status = persist::read_status_flag(home).context("failed to read update status flag")?;
    let last_updated = persist::read_last_updated(home)
        .context("failed to read last updated flag")?
        .map(|t| t.format(DATE_FORMAT).to_string());

    if json {
        return print_json(&StatusOutput {
            status,
            last_updated,
        });
    }

    match status {
        Some(s) => println!("Status:       {s}"),
        None => println!("Status:       never checked"),
    }
    match last_updated {
        Some(t) => println!("Last updated: {t} UTC"),
        None => println!("Last updated: never"),
    }
    Ok(())
}
