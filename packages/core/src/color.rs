//! ANSI palette for console output.

use std::borrow::Cow;

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";

/// Escape codes used by the console formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub timestamp: &'static str,  // Blue
    pub info: &'static str,       // Yellow
    pub alert: &'static str,      // Red for WARN and ERROR
    pub request_id: &'static str, // Green
    pub reset: &'static str,
}

impl ColorScheme {
    /// Palette with real escape codes, or all-empty codes when `use_colors`
    /// is false.
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                timestamp: BLUE,
                info: YELLOW,
                alert: RED,
                request_id: GREEN,
                reset: RESET,
            }
        } else {
            Self {
                timestamp: "",
                info: "",
                alert: "",
                request_id: "",
                reset: "",
            }
        }
    }

    /// Color for a level label. Matching ignores case; anything other than
    /// INFO, WARN or ERROR stays uncolored.
    pub fn level(&self, label: &str) -> &'static str {
        if label.eq_ignore_ascii_case("INFO") {
            self.info
        } else if label.eq_ignore_ascii_case("WARN") || label.eq_ignore_ascii_case("ERROR") {
            self.alert
        } else {
            ""
        }
    }

    /// Wrap `text` in `color` and a reset. An empty color leaves the text as is.
    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Remove CSI escape sequences (`ESC [ ... final-byte`) from `input`.
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    if !input.contains('\x1b') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates run until a byte in '@'..='~'.
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_is_yellow_and_alerts_are_red() {
        let colors = ColorScheme::new(true);
        assert_eq!(colors.level("INFO"), YELLOW);
        assert_eq!(colors.level("WARN"), RED);
        assert_eq!(colors.level("ERROR"), RED);
    }

    #[test]
    fn level_lookup_ignores_case() {
        let colors = ColorScheme::new(true);
        assert_eq!(colors.level("info"), YELLOW);
        assert_eq!(colors.level("Error"), RED);
    }

    #[test]
    fn debug_and_unknown_labels_are_uncolored() {
        let colors = ColorScheme::new(true);
        assert_eq!(colors.level("DEBUG"), "");
        assert_eq!(colors.level("TRACE"), "");
        assert_eq!(colors.paint(colors.level("DEBUG"), "DEBUG"), "DEBUG");
    }

    #[test]
    fn disabled_scheme_has_no_codes() {
        let colors = ColorScheme::new(false);
        assert_eq!(colors.level("ERROR"), "");
        assert_eq!(colors.paint(colors.timestamp, "x"), "x");
    }

    #[test]
    fn paint_wraps_with_reset() {
        let colors = ColorScheme::default();
        assert_eq!(colors.paint(GREEN, "abc"), "\x1b[32mabc\x1b[0m");
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[32mabc-123\x1b[0m"), "abc-123");
        assert_eq!(strip_ansi("\x1b[32m\x1b[0m"), "");
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
    }
}
