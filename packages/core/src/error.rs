//! Error types for logger setup and configuration.
//!
//! Name resolution and header extraction never fail; these errors only come
//! from the surrounding plumbing (env parsing, global installation, filter
//! reloads).

use thiserror::Error;
use tracing_subscriber::reload;

/// Errors raised while configuring or installing a logger.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Unknown severity: {name}")]
    UnknownSeverity { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("A global logger is already installed")]
    AlreadyInstalled,

    #[error("No global logger has been configured")]
    NotConfigured,

    #[error("Failed to update minimum level: {source}")]
    Reload {
        #[from]
        source: reload::Error,
    },
}

impl LoggerError {
    pub fn unknown_severity(name: impl Into<String>) -> Self {
        Self::UnknownSeverity { name: name.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
