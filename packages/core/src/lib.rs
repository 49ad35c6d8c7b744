// Library root. The binary in `src/main.rs` is a small demo service built on
// top of it.

pub mod api;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod logger;
pub mod request;
pub mod severity;
pub mod sink;

// Only needed by the binary.
pub mod cli;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use event::LogEvent;
pub use format::ConsoleFormat;
pub use logger::{
    configure_formatter, debug, error, global, info, init_fallback, log, set_minimum_level, warn, Logger,
};
pub use request::{request_id, REQUEST_ID_FIELD, REQUEST_ID_HEADER};
pub use severity::Severity;
pub use sink::MemorySink;
