//! Static registry of updatable targets.
//!
//! Order here is the order every check and apply pass walks the fleet.

use crate::error::{Result, UpdaterError};
use std::fmt;

pub const CONTROL_DOMAIN: &str = "dom0";

/// Cell holding the client; status flags are mirrored into it.
pub const SENSITIVE_CELL: &str = "sd-svs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    ControlDomain,
    FedoraTemplate,
    DebianTemplate,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::ControlDomain => "control_domain",
            TargetKind::FedoraTemplate => "fedora_template",
            TargetKind::DebianTemplate => "debian_template",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    /// Template the target resolves to. Identity for dom0 and bare templates.
    pub template: &'static str,
    pub kind: TargetKind,
}

impl Target {
    const fn new(name: &'static str, template: &'static str, kind: TargetKind) -> Self {
        Self {
            name,
            template,
            kind,
        }
    }

    pub fn is_control_domain(&self) -> bool {
        self.kind == TargetKind::ControlDomain
    }
}

static TARGETS: [Target; 9] = [
    Target::new(CONTROL_DOMAIN, CONTROL_DOMAIN, TargetKind::ControlDomain),
    Target::new("fedora", "fedora-30", TargetKind::FedoraTemplate),
    Target::new(
        "sd-svs-disp",
        "sd-svs-disp-buster-template",
        TargetKind::DebianTemplate,
    ),
    Target::new(SENSITIVE_CELL, "sd-svs-buster-template", TargetKind::DebianTemplate),
    Target::new("sd-log", "sd-log-buster-template", TargetKind::DebianTemplate),
    Target::new("sd-export", "sd-export-buster-template", TargetKind::DebianTemplate),
    Target::new("sd-proxy", "sd-proxy-buster-template", TargetKind::DebianTemplate),
    Target::new("sd-whonix", "whonix-gw-15", TargetKind::DebianTemplate),
    Target::new(
        "sd-gpg",
        "securedrop-workstation-buster",
        TargetKind::DebianTemplate,
    ),
];

pub fn all() -> &'static [Target] {
    &TARGETS
}

/// Every target except the control domain, in registry order.
pub fn cells() -> impl Iterator<Item = &'static Target> {
    TARGETS.iter().filter(|t| !t.is_control_domain())
}

pub fn lookup(name: &str) -> Result<&'static Target> {
    TARGETS
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| UpdaterError::UnknownTarget(name.to_string()))
}
