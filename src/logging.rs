//! Job event logging.
//!
//! Jobs report what they do (or would do in a dry run) through a [`JobLogger`].
//! Messages are templates with `{name}` placeholders filled from a context.

use std::fmt;
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};

use tracing::Level;

/// Receives job events.
pub trait JobLogger: fmt::Debug + Send + Sync {
    fn log(&self, level: Level, template: &str, context: &[(&str, Option<&str>)]);
}

pub type SharedLogger = Arc<dyn JobLogger>;

/// Replaces each `{name}` in `template` with its context value (`null` when absent).
///
/// The template is scanned once; placeholders inside substituted values stay as they are.
#[must_use]
pub fn render(template: &str, context: &[(&str, Option<&str>)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, tail) = rest.split_at(open);
        message.push_str(before);
        let placeholder = tail.find('}').and_then(|close| {
            let name = tail.get(1..close)?;
            let (_, value) = context.iter().find(|(candidate, _)| *candidate == name)?;
            Some((close, value.unwrap_or("null")))
        });
        if let Some((close, value)) = placeholder {
            message.push_str(value);
            rest = tail.get(close + 1..).unwrap_or_default();
        } else {
            message.push('{');
            rest = tail.get(1..).unwrap_or_default();
        }
    }
    message.push_str(rest);
    message
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl JobLogger for NullLogger {
    fn log(&self, _level: Level, _template: &str, _context: &[(&str, Option<&str>)]) {}
}

/// Forwards rendered messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl JobLogger for TracingLogger {
    fn log(&self, level: Level, template: &str, context: &[(&str, Option<&str>)]) {
        let message = render(template, context);
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Keeps rendered messages in order.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    /// Entries in logging order.
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.message).collect()
    }
}

impl JobLogger for RecordingLogger {
    fn log(&self, level: Level, template: &str, context: &[(&str, Option<&str>)]) {
        let message = render(template, context);
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(LogEntry { level, message });
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::key("Adding key {key}.", &[("key", Some("greeting"))], "Adding key greeting.")]
    #[case::null("{key}: {old} -> {new}", &[("key", Some("a")), ("old", None), ("new", Some("b"))], "a: null -> b")]
    #[case::unknown("{other}", &[("key", Some("a"))], "{other}")]
    #[case::single_pass("{key}: Updating source value.", &[("key", Some("a{new}")), ("new", Some("X"))], "a{new}: Updating source value.")]
    #[case::nested_brace("{{key}}", &[("key", Some("a"))], "{a}")]
    #[case::unclosed("{key", &[("key", Some("a"))], "{key")]
    fn render_fills_placeholders(
        #[case] template: &str,
        #[case] context: &[(&str, Option<&str>)],
        #[case] expected: &str,
    ) {
        assert_that!(render(template, context), eq(expected));
    }

    #[rstest]
    fn recording_logger_keeps_order() {
        let logger = RecordingLogger::new();
        logger.log(Level::DEBUG, "first {key}", &[("key", Some("a"))]);
        logger.log(Level::INFO, "second", &[]);

        assert_that!(
            logger.entries(),
            elements_are![
                eq(&LogEntry { level: Level::DEBUG, message: "first a".to_string() }),
                eq(&LogEntry { level: Level::INFO, message: "second".to_string() }),
            ]
        );
    }
}
