//! Error types for the crewl CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages. Nothing in this crate recovers from an error locally: every
//! failure propagates to `main`, which prints the message and exits with
//! the mapped code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for crewl operations.
#[derive(Error, Debug)]
pub enum CrewlError {
    /// User provided invalid arguments, an unparsable environment variable,
    /// or a configuration file is missing or unreadable.
    #[error("{0}")]
    UserError(String),

    /// A configuration file parsed but failed validation, or the crew
    /// wiring is inconsistent (unknown agent, bad context reference).
    #[error("Configuration invalid: {0}")]
    ConfigError(String),

    /// The task runtime failed while executing a task.
    #[error("Task execution failed: {0}")]
    RuntimeError(String),
}

impl CrewlError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrewlError::UserError(_) => exit_codes::USER_ERROR,
            CrewlError::ConfigError(_) => exit_codes::CONFIG_FAILURE,
            CrewlError::RuntimeError(_) => exit_codes::RUNTIME_FAILURE,
        }
    }
}

/// Result type alias for crewl operations.
pub type Result<T> = std::result::Result<T, CrewlError>;
