//! Error handling for the rvmon binary.

use thiserror::Error;

/// Errors that can occur while setting up or running the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A problem with the configuration file or logging setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Guest machine setup failed.
    #[error(transparent)]
    Machine(#[from] rvmon_machine::MachineError),

    /// IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file did not parse.
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The line editor failed.
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias using MonitorError.
pub type Result<T> = std::result::Result<T, MonitorError>;
