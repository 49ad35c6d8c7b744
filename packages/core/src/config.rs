use std::env;

use crate::error::LoggerError;
use crate::severity::Severity;

/// Settings for a [`Logger`](crate::Logger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum severity rendered.
    pub level: Severity,
    /// Write ANSI color codes.
    pub ansi: bool,
    /// Append the call site to every line.
    pub display_caller: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Severity::Debug,
            ansi: true,
            display_caller: true,
        }
    }
}

impl LoggerConfig {
    /// Read `LOG_LEVEL`, `LOG_COLOR`, `NO_COLOR` and `LOG_CALLER`.
    ///
    /// Unknown level names fall back to DEBUG; malformed booleans are errors.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggerError> {
        let defaults = Self::default();

        let level = lookup("LOG_LEVEL")
            .map(|name| Severity::resolve(&name))
            .unwrap_or(defaults.level);

        let ansi = match lookup("LOG_COLOR") {
            Some(value) => parse_bool("LOG_COLOR", &value)?,
            None => defaults.ansi,
        } && lookup("NO_COLOR").map_or(true, |value| value.is_empty());

        let display_caller = match lookup("LOG_CALLER") {
            Some(value) => parse_bool("LOG_CALLER", &value)?,
            None => defaults.display_caller,
        };

        Ok(Self {
            level,
            ansi,
            display_caller,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, LoggerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::config(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}
