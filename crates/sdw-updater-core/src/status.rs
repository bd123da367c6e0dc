use crate::error::UpdaterError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// UpdateStatus
// ---------------------------------------------------------------------------

/// Outcome of checking or applying updates for one target.
///
/// Declaration order is not priority order; see [`UpdateStatus::priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatus {
    UpdatesOk,
    UpdatesRequired,
    UpdatesFailed,
    RebootRequired,
}

impl UpdateStatus {
    pub fn all() -> &'static [UpdateStatus] {
        &[
            UpdateStatus::UpdatesOk,
            UpdateStatus::UpdatesRequired,
            UpdateStatus::UpdatesFailed,
            UpdateStatus::RebootRequired,
        ]
    }

    /// Value written to the status flag files.
    pub fn as_value(self) -> &'static str {
        match self {
            UpdateStatus::UpdatesOk => "0",
            UpdateStatus::UpdatesRequired => "1",
            UpdateStatus::RebootRequired => "2",
            UpdateStatus::UpdatesFailed => "3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpdateStatus::UpdatesOk => "UPDATES_OK",
            UpdateStatus::UpdatesRequired => "UPDATES_REQUIRED",
            UpdateStatus::UpdatesFailed => "UPDATES_FAILED",
            UpdateStatus::RebootRequired => "REBOOT_REQUIRED",
        }
    }

    /// Aggregation rank. Higher wins when results are combined.
    pub fn priority(self) -> u8 {
        match self {
            UpdateStatus::UpdatesOk => 0,
            UpdateStatus::UpdatesRequired => 1,
            UpdateStatus::RebootRequired => 2,
            UpdateStatus::UpdatesFailed => 3,
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UpdateStatus {
    type Err = UpdaterError;

    /// Parses a persisted flag value (`"0"`..`"3"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(UpdateStatus::UpdatesOk),
            "1" => Ok(UpdateStatus::UpdatesRequired),
            "2" => Ok(UpdateStatus::RebootRequired),
            "3" => Ok(UpdateStatus::UpdatesFailed),
            other => Err(UpdaterError::InvalidStatus(other.to_string())),
        }
    }
}

/// Reduce any number of statuses to one fleet-wide verdict.
///
/// FAILED beats REBOOT_REQUIRED beats UPDATES_REQUIRED beats UPDATES_OK.
/// An empty input is `UpdatesOk`.
pub fn overall_status<I>(statuses: I) -> UpdateStatus
where
    I: IntoIterator<Item = UpdateStatus>,
{
    statuses
        .into_iter()
        .max_by_key(|s| s.priority())
        .unwrap_or(UpdateStatus::UpdatesOk)
}

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// Per-target statuses from one check or apply pass, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<(String, UpdateStatus)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status. A name that is already present keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, status: UpdateStatus) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = status,
            None => self.entries.push((name, status)),
        }
    }

    pub fn get(&self, name: &str) -> Option<UpdateStatus> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, UpdateStatus)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overall(&self) -> UpdateStatus {
        overall_status(self.entries.iter().map(|(_, s)| *s))
    }
}

impl<N: Into<String>> FromIterator<(N, UpdateStatus)> for ResultSet {
    fn from_iter<T: IntoIterator<Item = (N, UpdateStatus)>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        for (name, status) in iter {
            set.insert(name, status);
        }
        set
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, status) in &self.entries {
            map.serialize_entry(name, status)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
