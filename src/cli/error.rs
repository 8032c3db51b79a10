//! CLI-level errors (wraps domain and settings errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::NodeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Node(#[from] NodeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no node carries tags: {0}")]
    NoMatch(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::NoMatch(_) => crate::exitcode::NOMATCH,
            CliError::Input { .. } => crate::exitcode::NOINPUT,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Node(e) => match e {
                NodeError::Json(_) => crate::exitcode::DATAERR,
                NodeError::NodeAsData(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}
