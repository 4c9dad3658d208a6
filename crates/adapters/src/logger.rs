//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use rulesynth_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Warn,
        }
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let mut fields = self.base_fields.clone();
        if let Some(extra) = event.fields {
            fields.extend(extra);
        }

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_owned(), Value::from(now_epoch_ms()));
        payload.insert("level".to_owned(), Value::from(event.level.as_str()));
        payload.insert("event".to_owned(), Value::String(event.event.into_string()));
        payload.insert("message".to_owned(), Value::String(event.message.into_string()));
        if !fields.is_empty() {
            let object = fields
                .into_iter()
                .map(|(key, value)| (key.into_string(), value))
                .collect();
            payload.insert("fields".to_owned(), Value::Object(object));
        }
        if let Some(error) = event.error {
            payload.insert("error".to_owned(), error);
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_owned()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
