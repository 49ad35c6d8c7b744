//! Logger construction, installation and level control.
//!
//! A [`Logger`] owns a `tracing` dispatcher made of a reloadable level filter
//! and a `fmt` layer using [`ConsoleFormat`]. It can be used explicitly, or
//! installed once as the process-wide default so that the free functions in
//! this module (and plain `tracing` macros) route through it.

use std::sync::{Mutex, OnceLock};

use axum::http::HeaderMap;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, Registry};

use crate::config::LoggerConfig;
use crate::error::LoggerError;
use crate::event::LogEvent;
use crate::format::ConsoleFormat;
use crate::severity::Severity;

static GLOBAL: OnceLock<Logger> = OnceLock::new();
static INSTALL: Mutex<()> = Mutex::new(());
static FALLBACK: OnceLock<Dispatch> = OnceLock::new();

/// A configured console logger. Clones share the same subscriber and level.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
    level: reload::Handle<LevelFilter, Registry>,
}

impl Logger {
    /// Logger writing to stdout.
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_writer(config, std::io::stdout)
    }

    /// Logger writing to any `MakeWriter`.
    pub fn with_writer<W>(config: LoggerConfig, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let (filter, level) = reload::Layer::new(config.level.level_filter());

        let console = fmt::layer()
            .event_format(ConsoleFormat::new().with_caller(config.display_caller))
            .with_writer(writer)
            .with_ansi(config.ansi);

        let subscriber = tracing_subscriber::registry().with(filter).with(console);

        Self {
            dispatch: Dispatch::new(subscriber),
            level,
        }
    }

    /// Make this logger the process-wide default.
    pub fn install(self) -> Result<&'static Logger, LoggerError> {
        let _guard = INSTALL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.install_locked()
    }

    /// Caller holds `INSTALL`.
    fn install_locked(self) -> Result<&'static Logger, LoggerError> {
        if GLOBAL.get().is_some() {
            return Err(LoggerError::AlreadyInstalled);
        }
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| LoggerError::AlreadyInstalled)?;
        Ok(GLOBAL.get_or_init(|| self))
    }

    /// Run `f` with this logger as the thread's default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Only events at `severity` or above are rendered from now on.
    pub fn set_minimum_level(&self, severity: Severity) -> Result<(), LoggerError> {
        self.level
            .modify(|filter| *filter = severity.level_filter())?;
        Ok(())
    }

    pub fn minimum_level(&self) -> Option<LevelFilter> {
        self.level.clone_current()
    }

    /// Start an event at the severity called `name` (unknown names → DEBUG).
    pub fn log(&self, name: &str, request: Option<&HeaderMap>) -> LogEvent<'_> {
        self.at(Severity::resolve(name), request)
    }

    pub fn at(&self, severity: Severity, request: Option<&HeaderMap>) -> LogEvent<'_> {
        LogEvent::new(Some(&self.dispatch), severity, request)
    }

    pub fn debug(&self, request: Option<&HeaderMap>) -> LogEvent<'_> {
        self.at(Severity::Debug, request)
    }

    pub fn info(&self, request: Option<&HeaderMap>) -> LogEvent<'_> {
        self.at(Severity::Info, request)
    }

    pub fn warn(&self, request: Option<&HeaderMap>) -> LogEvent<'_> {
        self.at(Severity::Warn, request)
    }

    pub fn error(&self, request: Option<&HeaderMap>) -> LogEvent<'_> {
        self.at(Severity::Error, request)
    }
}

/// Install the default console logger once. Later calls return the logger
/// that is already installed.
pub fn configure_formatter() -> Result<&'static Logger, LoggerError> {
    let _guard = INSTALL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match GLOBAL.get() {
        Some(logger) => Ok(logger),
        None => Logger::new(LoggerConfig::default()).install_locked(),
    }
}

/// The installed global logger, if any.
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Route events that are emitted before any logger is configured to
/// `writer`. Returns false if the fallback was already in use.
pub fn init_fallback<W>(writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FALLBACK.set(plain_dispatch(writer)).is_ok()
}

/// Default `fmt` rendering on stderr for events nobody configured a logger for.
pub(crate) fn fallback() -> &'static Dispatch {
    FALLBACK.get_or_init(|| plain_dispatch(std::io::stderr))
}

fn plain_dispatch<W>(writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    Dispatch::new(subscriber)
}

/// Set the global minimum level by name; unknown names mean DEBUG.
pub fn set_minimum_level(name: &str) -> Result<(), LoggerError> {
    global()
        .ok_or(LoggerError::NotConfigured)?
        .set_minimum_level(Severity::resolve(name))
}

/// Start an event at the severity called `name` on the current dispatcher.
pub fn log(name: &str, request: Option<&HeaderMap>) -> LogEvent<'static> {
    LogEvent::new(None, Severity::resolve(name), request)
}

pub fn debug(request: Option<&HeaderMap>) -> LogEvent<'static> {
    LogEvent::new(None, Severity::Debug, request)
}

pub fn info(request: Option<&HeaderMap>) -> LogEvent<'static> {
    LogEvent::new(None, Severity::Info, request)
}

pub fn warn(request: Option<&HeaderMap>) -> LogEvent<'static> {
    LogEvent::new(None, Severity::Warn, request)
}

pub fn error(request: Option<&HeaderMap>) -> LogEvent<'static> {
    LogEvent::new(None, Severity::Error, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn plain_logger() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let config = LoggerConfig {
            ansi: false,
            display_caller: false,
            ..LoggerConfig::default()
        };
        (Logger::with_writer(config, sink.clone()), sink)
    }

    #[test]
    fn every_level_function_returns_its_severity() {
        let (logger, _sink) = plain_logger();

        assert_eq!(logger.debug(None).severity(), Severity::Debug);
        assert_eq!(logger.info(None).severity(), Severity::Info);
        assert_eq!(logger.warn(None).severity(), Severity::Warn);
        assert_eq!(logger.error(None).severity(), Severity::Error);
    }

    #[test]
    fn unknown_name_dispatches_like_debug() {
        let (logger, sink) = plain_logger();

        logger.log("TRACE", None).msg("same");
        logger.log("DEBUG", None).msg("same");

        // Compare everything after the timestamp.
        let lines: Vec<String> = sink
            .lines()
            .iter()
            .filter_map(|line| line.split_once(']').map(|(_, rest)| rest.to_string()))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
        assert_eq!(lines[0], " |DEBUG| - same");
    }

    #[test]
    fn minimum_level_filters_lower_severities() {
        let (logger, sink) = plain_logger();
        logger.set_minimum_level(Severity::resolve("ERROR")).unwrap();

        logger.info(None).msg("hidden");
        assert!(sink.contents().is_empty());

        logger.error(None).msg("shown");
        assert!(sink.contents().contains("|ERROR| - shown"));
    }

    #[test]
    fn bogus_minimum_level_is_most_verbose() {
        let (logger, sink) = plain_logger();
        logger.set_minimum_level(Severity::Error).unwrap();
        logger.set_minimum_level(Severity::resolve("bogus")).unwrap();

        assert_eq!(logger.minimum_level(), Some(LevelFilter::DEBUG));
        logger.debug(None).msg("visible");
        assert!(sink.contents().contains("|DEBUG| - visible"));
    }

    #[test]
    fn initial_level_comes_from_config() {
        let sink = MemorySink::new();
        let config = LoggerConfig {
            level: Severity::Warn,
            ansi: false,
            display_caller: false,
        };
        let logger = Logger::with_writer(config, sink.clone());

        logger.info(None).msg("hidden");
        logger.warn(None).msg("shown");

        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn in_scope_routes_tracing_macros_through_the_logger() {
        let (logger, sink) = plain_logger();

        logger.in_scope(|| tracing::warn!(code = 7, "plain macro"));

        assert!(sink.contents().contains("|WARN| - plain macro code:7"));
    }

    #[test]
    fn free_functions_use_the_scoped_dispatcher() {
        let (logger, sink) = plain_logger();

        logger.in_scope(|| info(None).str("via", "free").msg("ambient"));

        assert!(sink.contents().contains("|INFO| - ambient via:free"));
    }

    #[test]
    fn colored_logger_paints_level_labels() {
        let sink = MemorySink::new();
        let logger = Logger::with_writer(LoggerConfig::default(), sink.clone());

        logger.debug(None).msg("d");
        logger.warn(None).msg("w");

        let lines = sink.lines();
        assert!(lines[0].contains(" |DEBUG| "));
        assert!(lines[1].contains(" |\x1b[31mWARN\x1b[0m| "));
    }
}
