mod cmd;
mod logging;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use sdw_updater_core::{config::UpdaterConfig, paths};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sdw-update",
    about = "Check, apply and restart updates across the SecureDrop Workstation fleet",
    version,
    propagate_version = true
)]
struct Cli {
    /// dom0 home directory holding .securedrop_launcher/ (default: $HOME)
    #[arg(long, global = true, env = "SDW_UPDATER_HOME")]
    home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every target for pending updates and record the verdict
    Check,

    /// Apply updates, restart the service cells and record the verdict
    Apply {
        /// Targets to update (default: every target except dom0)
        targets: Vec<String>,
    },

    /// Show the last recorded status and update time
    Status,

    /// Inspect or create updater.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let home = paths::resolve_home(cli.home.as_deref())?;
    let config = UpdaterConfig::load(&home)
        .with_context(|| format!("failed to load {}", paths::config_path(&home).display()))?;

    // Only commands that drive the fleet write to the launcher log file.
    let drives_fleet = matches!(cli.command, Commands::Check | Commands::Apply { .. });
    let _guard = logging::init(&home, &config, drives_fleet)?;
    tracing::debug!(home = %home.display(), "resolved dom0 home");

    match cli.command {
        Commands::Check => cmd::check::run(&home, cli.json),
        Commands::Apply { targets } => cmd::apply::run(&home, &targets, cli.json),
        Commands::Status => cmd::status::run(&home, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&home, &config, subcommand, cli.json),
    }
}
