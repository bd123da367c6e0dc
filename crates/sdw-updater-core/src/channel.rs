//! Synchronous command execution in dom0 and inside Qubes domains.
//!
//! The argv builders below are a contract with the Qubes tooling; their exact
//! shapes are relied on by callers and tests.

use crate::error::{Result, UpdaterError};
use std::process::{Command, Stdio};

/// Runs one external command to completion.
pub trait CommandChannel {
    /// Blocks until the command exits. Nonzero exit is `CommandFailed`.
    fn invoke(&self, argv: &[String]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// QubesChannel
// ---------------------------------------------------------------------------

/// Executes commands as local processes, capturing stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct QubesChannel;

impl QubesChannel {
    pub fn new() -> Self {
        Self
    }
}

impl CommandChannel for QubesChannel {
    fn invoke(&self, argv: &[String]) -> Result<()> {
        let (program, args) = argv.split_first().ok_or(UpdaterError::EmptyCommand)?;
        let bin =
            which::which(program).map_err(|_| UpdaterError::ProgramNotFound(program.clone()))?;

        tracing::debug!(command = %argv.join(" "), "invoking");
        let output = Command::new(&bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| UpdaterError::Spawn {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(UpdaterError::CommandFailed {
            argv: argv.to_vec(),
            exit_code: output.status.code().unwrap_or(-1),
            output: combined.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// argv builders
// ---------------------------------------------------------------------------

pub const DNF_CHECK_UPDATE: &str = "dnf check-update";
pub const APT_REFRESH: &str = "sudo apt update";
pub const APT_NOTHING_UPGRADABLE: &str = "[[ $(apt list --upgradable | wc -l) -eq 1 ]]";

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

pub fn dom0_check_only() -> Vec<String> {
    argv(&["sudo", "qubes-dom0-update", "--check-only"])
}

pub fn dom0_apply() -> Vec<String> {
    argv(&["sudo", "qubes-dom0-update", "-y"])
}

/// Run a shell command inside `domain`.
pub fn qvm_run(domain: &str, command: &str) -> Vec<String> {
    argv(&["qvm-run", domain, command])
}

/// Shut `domain` down. With `wait`, the command returns only once it has halted.
pub fn qvm_shutdown(domain: &str, wait: bool) -> Vec<String> {
    if wait {
        argv(&["qvm-shutdown", "--wait", domain])
    } else {
        argv(&["qvm-shutdown", domain])
    }
}

pub fn qvm_start(domain: &str) -> Vec<String> {
    argv(&["qvm-start", domain])
}

/// Apply the `update.qubes-vm` salt state to one template.
pub fn qubesctl_update(template: &str) -> Vec<String> {
    argv(&[
        "sudo",
        "qubesctl",
        "--skip-dom0",
        "--targets",
        template,
        "state.sls",
        "update.qubes-vm",
    ])
}
