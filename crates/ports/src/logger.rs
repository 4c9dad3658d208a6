//! Structured logging boundary contract.

use rulesynth_shared::ErrorEnvelope;
use std::collections::BTreeMap;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
}

impl LogLevel {
    /// Lowercase name used in log payloads and config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Additional event fields.
pub type LogFields = BTreeMap<Box<str>, serde_json::Value>;

/// Structured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Stable event name.
    pub event: Box<str>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: Box<str>,
    /// Optional structured fields.
    pub fields: Option<LogFields>,
    /// Optional error payload.
    pub error: Option<serde_json::Value>,
}

/// Boundary contract for structured logging.
pub trait LoggerPort: Send + Sync {
    /// Emit a structured event.
    fn log(&self, event: LogEvent);

    /// Convenience: debug event.
    fn debug(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(simple_event(event, LogLevel::Debug, message, fields));
    }

    /// Convenience: info event.
    fn info(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(simple_event(event, LogLevel::Info, message, fields));
    }

    /// Convenience: warn event.
    fn warn(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(simple_event(event, LogLevel::Warn, message, fields));
    }

    /// Convenience: error event.
    fn error(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(simple_event(event, LogLevel::Error, message, fields));
    }

    /// Emit an event carrying a serialized error envelope.
    fn log_envelope(&self, event: &str, level: LogLevel, error: &ErrorEnvelope) {
        self.log(LogEvent {
            event: event.to_owned().into_boxed_str(),
            level,
            message: error.message.clone().into_boxed_str(),
            fields: None,
            error: serde_json::to_value(error).ok(),
        });
    }
}

fn simple_event(event: &str, level: LogLevel, message: &str, fields: Option<LogFields>) -> LogEvent {
    LogEvent {
        event: event.to_owned().into_boxed_str(),
        level,
        message: message.to_owned().into_boxed_str(),
        fields,
        error: None,
    }
}

/// Build a field map from key/value pairs.
pub fn log_fields<I, K, V>(pairs: I) -> LogFields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into().into_boxed_str(), value.into()))
        .collect()
}
