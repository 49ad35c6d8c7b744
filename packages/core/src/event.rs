//! Chainable log event handle.
//!
//! A [`LogEvent`] collects fields until one of its terminators (`msg` or
//! `send`) hands it to `tracing` at its severity. Handles obtained from a
//! [`Logger`](crate::Logger) emit through that logger; handles from the free
//! functions emit through whatever dispatcher is current, or through a plain
//! stderr `fmt` subscriber when nothing has been configured yet.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use axum::http::HeaderMap;
use tracing::subscriber::NoSubscriber;
use tracing::{Dispatch, Level};

use crate::color::ColorScheme;
use crate::format::write_field;
use crate::logger::fallback;
use crate::request::{request_id, REQUEST_ID_FIELD};
use crate::severity::Severity;

/// Target of every event emitted by a handle.
pub const EVENT_TARGET: &str = "request_logger";

type Fields = Vec<(Cow<'static, str>, String)>;

/// One in-progress log line.
#[must_use = "a LogEvent is only emitted once `msg` or `send` is called"]
#[derive(Debug)]
pub struct LogEvent<'a> {
    dispatch: Option<&'a Dispatch>,
    severity: Severity,
    fields: Fields,
}

impl<'a> LogEvent<'a> {
    pub(crate) fn new(
        dispatch: Option<&'a Dispatch>,
        severity: Severity,
        request: Option<&HeaderMap>,
    ) -> Self {
        let event = Self {
            dispatch,
            severity,
            fields: Vec::new(),
        };
        match request {
            None => event,
            Some(headers) => {
                let colors = ColorScheme::new(true);
                let id = colors.paint(colors.request_id, &request_id(headers));
                event.str(REQUEST_ID_FIELD, id)
            }
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Attach a string field.
    pub fn str(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attach any displayable value.
    pub fn field(self, name: impl Into<Cow<'static, str>>, value: impl fmt::Display) -> Self {
        self.str(name, value.to_string())
    }

    /// Attach an error under `error`.
    pub fn err(self, err: &dyn std::error::Error) -> Self {
        self.str("error", err.to_string())
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_str()))
    }

    /// Emit the event with `message`.
    #[track_caller]
    pub fn msg(self, message: impl fmt::Display) {
        self.emit(&message, Location::caller());
    }

    /// Emit the event without a message.
    #[track_caller]
    pub fn send(self) {
        self.emit(&"", Location::caller());
    }

    fn emit(self, message: &dyn fmt::Display, location: &Location<'_>) {
        let caller = Caller(location);
        let fields = RenderedFields(&self.fields);

        macro_rules! emit_at {
            ($level:expr) => {
                tracing::event!(
                    target: EVENT_TARGET,
                    $level,
                    handle.caller = %caller,
                    handle.fields = %fields,
                    "{}",
                    message
                )
            };
        }

        let run = || match self.severity {
            Severity::Debug => emit_at!(Level::DEBUG),
            Severity::Info => emit_at!(Level::INFO),
            Severity::Warn => emit_at!(Level::WARN),
            Severity::Error => emit_at!(Level::ERROR),
        };

        let unconfigured =
            || tracing::dispatcher::get_default(|current| current.is::<NoSubscriber>());
        match self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, run),
            None if unconfigured() => tracing::dispatcher::with_default(fallback(), run),
            None => run(),
        }
    }
}

struct Caller<'a>(&'a Location<'a>);

impl fmt::Display for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.file(), self.0.line())
    }
}

struct RenderedFields<'a>(&'a Fields);

impl fmt::Display for RenderedFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_field(f, name, value)?;
        }
        Ok(())
    }
}
