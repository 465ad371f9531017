//! CLI-level errors (wraps library errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::errors::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

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
            CliError::Tree(_) => crate::exitcode::SOFTWARE,
            CliError::Settings(e) => match e {
                SettingsError::Read { .. } => crate::exitcode::IOERR,
                SettingsError::Parse { .. } | SettingsError::InvalidOrder(_) => {
                    crate::exitcode::DATAERR
                }
                SettingsError::Config(_) | SettingsError::Serialize(_) => crate::exitcode::CONFIG,
            },
        }
    }
}
