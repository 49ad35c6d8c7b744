//! Console line formatter.
//!
//! Renders every event as
//! `[<timestamp>] |<LEVEL>| - <message> <name>:<value> ... caller:<file>:<line>`
//! with the timestamp in blue and the level label colored by severity.
//! When the writer is not ANSI-capable nothing is colored and escape codes
//! already embedded in field values are stripped.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use chrono::{Local, SecondsFormat};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::color::{strip_ansi, ColorScheme};

/// Carries the user call site of handle-based events.
pub(crate) const CALLER_FIELD: &str = "handle.caller";
/// Carries the pre-rendered fields of handle-based events.
pub(crate) const HANDLE_FIELDS: &str = "handle.fields";

/// RFC 3339 timestamps in local time, second precision (`Z` for UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339;

impl FormatTime for Rfc3339 {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(
            w,
            "{}",
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Write one `name:value` pair.
pub(crate) fn write_field(w: &mut impl fmt::Write, name: &str, value: &str) -> fmt::Result {
    write!(w, "{}:{}", name, value)
}

/// Event formatter producing the colored console layout.
#[derive(Debug, Clone)]
pub struct ConsoleFormat<T = Rfc3339> {
    timer: T,
    display_caller: bool,
}

impl ConsoleFormat<Rfc3339> {
    pub fn new() -> Self {
        Self {
            timer: Rfc3339,
            display_caller: true,
        }
    }
}

impl Default for ConsoleFormat<Rfc3339> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConsoleFormat<T> {
    /// Replace the timestamp source.
    pub fn with_timer<T2>(self, timer: T2) -> ConsoleFormat<T2> {
        ConsoleFormat {
            timer,
            display_caller: self.display_caller,
        }
    }

    /// Append `caller:<file>:<line>` to every line.
    pub fn with_caller(self, display_caller: bool) -> Self {
        Self {
            display_caller,
            ..self
        }
    }
}

impl<S, N, T> FormatEvent<S, N> for ConsoleFormat<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let ansi = writer.has_ansi_escapes();
        let colors = ColorScheme::new(ansi);
        let metadata = event.metadata();

        let mut line = LineVisitor::default();
        event.record(&mut line);

        write!(writer, "{}[", colors.timestamp)?;
        self.timer.format_time(&mut writer)?;
        write!(writer, "]{}", colors.reset)?;

        let label = metadata.level().as_str();
        write!(writer, " |{}|", colors.paint(colors.level(label), label))?;

        write!(writer, " - {}", line.message.as_deref().unwrap_or_default())?;

        for (name, value) in &line.fields {
            writer.write_char(' ')?;
            write_field(&mut writer, name, &clean(value, ansi))?;
        }

        if let Some(rendered) = line.handle_fields.as_deref().filter(|f| !f.is_empty()) {
            write!(writer, " {}", clean(rendered, ansi))?;
        }

        if self.display_caller {
            let caller = match line.caller {
                Some(caller) => caller,
                None => format!(
                    "{}:{}",
                    metadata.file().unwrap_or("<unknown>"),
                    metadata.line().unwrap_or_default()
                ),
            };
            writer.write_char(' ')?;
            write_field(&mut writer, "caller", &caller)?;
        }

        writeln!(writer)
    }
}

fn clean(value: &str, ansi: bool) -> Cow<'_, str> {
    if ansi {
        Cow::Borrowed(value)
    } else {
        strip_ansi(value)
    }
}

/// Splits an event's fields into message, handle metadata and plain fields.
#[derive(Default)]
struct LineVisitor {
    message: Option<String>,
    caller: Option<String>,
    handle_fields: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            CALLER_FIELD => self.caller = Some(value),
            HANDLE_FIELDS => self.handle_fields = Some(value),
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLUE, RED, RESET, YELLOW};
    use crate::sink::MemorySink;
    use tracing_subscriber::fmt as fmt_layer;
    use tracing_subscriber::prelude::*;

    struct FixedTime;

    impl FormatTime for FixedTime {
        fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
            w.write_str("2024-01-02T03:04:05Z")
        }
    }

    fn render(ansi: bool, caller: bool, emit: impl FnOnce()) -> String {
        let sink = MemorySink::new();
        let subscriber = tracing_subscriber::registry().with(
            fmt_layer::layer()
                .event_format(ConsoleFormat::new().with_timer(FixedTime).with_caller(caller))
                .with_writer(sink.clone())
                .with_ansi(ansi),
        );
        tracing::subscriber::with_default(subscriber, emit);
        sink.contents()
    }

    #[test]
    fn renders_the_full_colored_layout() {
        let out = render(true, false, || tracing::info!(user = "bob", attempts = 3, "signed in"));

        assert_eq!(
            out,
            format!(
                "{BLUE}[2024-01-02T03:04:05Z]{RESET} |{YELLOW}INFO{RESET}| - signed in user:bob attempts:3\n"
            )
        );
    }

    #[test]
    fn debug_label_is_not_colored() {
        let out = render(true, false, || tracing::debug!("details"));

        assert!(out.contains(" |DEBUG| - details"));
    }

    #[test]
    fn warn_and_error_labels_are_red() {
        let warn = render(true, false, || tracing::warn!("careful"));
        let error = render(true, false, || tracing::error!("broken"));

        assert!(warn.contains(&format!("|{RED}WARN{RESET}|")));
        assert!(error.contains(&format!("|{RED}ERROR{RESET}|")));
    }

    #[test]
    fn plain_writer_gets_no_escape_codes() {
        let out = render(false, false, || {
            tracing::error!(tag = "\x1b[32mabc\x1b[0m", "broken")
        });

        assert_eq!(out, "[2024-01-02T03:04:05Z] |ERROR| - broken tag:abc\n");
    }

    #[test]
    fn appends_call_site_when_enabled() {
        let out = render(false, true, || tracing::info!("located"));

        assert!(out.contains(" - located caller:"));
        assert!(out.contains("format.rs:"));
    }

    #[test]
    fn rfc3339_timer_writes_a_parseable_timestamp() {
        let mut buf = String::new();
        Rfc3339.format_time(&mut Writer::new(&mut buf)).unwrap();

        assert!(chrono::DateTime::parse_from_rfc3339(&buf).is_ok());
    }
}
