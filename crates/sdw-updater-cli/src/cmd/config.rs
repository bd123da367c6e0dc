use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use sdw_updater_core::{config::UpdaterConfig, paths};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Write updater.yaml with default settings if it does not exist
    Init,
}

pub fn run(
    home: &Path,
    config: &UpdaterConfig,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(home, config, json),
        ConfigSubcommand::Init => init(home),
    }
}

fn show(home: &Path, config: &UpdaterConfig, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }
    println!("config:      {}", paths::config_path(home).display());
    println!("log_level:   {}", config.log_level);
    println!("log_to_file: {}", config.log_to_file);
    Ok(())
}

fn init(home: &Path) -> anyhow::Result<()> {
    let path = paths::config_path(home);
    if path.exists() {
        println!("{} already exists", path.display());
        return Ok(());
    }
    UpdaterConfig::default()
        .save(home)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
