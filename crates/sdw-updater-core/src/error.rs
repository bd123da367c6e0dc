use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error("Command '{}' returned non-zero exit status {exit_code}.", .argv.join(" "))]
    CommandFailed {
        argv: Vec<String>,
        exit_code: i32,
        output: String,
    },

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command not found: {0}")]
    ProgramNotFound(String),

    #[error("empty command line")]
    EmptyCommand,

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("no targets requested")]
    NoTargets,

    #[error("invalid update status value '{0}'")]
    InvalidStatus(String),

    #[error("invalid last-updated timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("home directory not found: set HOME or pass --home")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl UpdaterError {
    /// Display text, followed by the command's captured output when there is any.
    pub fn diagnostic(&self) -> String {
        match self {
            UpdaterError::CommandFailed { output, .. } if !output.is_empty() => {
                format!("{self}\n{output}")
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
