//! In-memory command channel and log sink for engine tests.

use crate::channel::CommandChannel;
use crate::error::{Result, UpdaterError};
use crate::log::LogSink;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Records every argv and answers from a script; unscripted calls succeed.
#[derive(Default)]
pub struct ScriptedChannel {
    script: RefCell<VecDeque<bool>>,
    always_fail: Vec<Vec<String>>,
    failure_output: String,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes for the next calls, in order: `true` succeeds, `false` fails.
    pub fn with_script(outcomes: &[bool]) -> Self {
        Self {
            script: RefCell::new(outcomes.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// Fail every call whose argv equals `argv`, regardless of the script.
    pub fn failing(mut self, argv: Vec<String>) -> Self {
        self.always_fail.push(argv);
        self
    }

    /// Output captured by every failing call.
    pub fn with_failure_output(mut self, output: &str) -> Self {
        self.failure_output = output.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandChannel for ScriptedChannel {
    fn invoke(&self, argv: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(argv.to_vec());
        let scripted = self.script.borrow_mut().pop_front().unwrap_or(true);
        let forced = self.always_fail.iter().any(|a| a == argv);
        if scripted && !forced {
            Ok(())
        } else {
            Err(UpdaterError::CommandFailed {
                argv: argv.to_vec(),
                exit_code: 1,
                output: self.failure_output.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Info(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingLog {
    entries: RefCell<Vec<Entry>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Info(m) => Some(m),
                Entry::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Error(m) => Some(m),
                Entry::Info(_) => None,
            })
            .collect()
    }
}

impl LogSink for RecordingLog {
    fn info(&self, message: &str) {
        self.entries.borrow_mut().push(Entry::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries
            .borrow_mut()
            .push(Entry::Error(message.to_string()));
    }
}

pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
