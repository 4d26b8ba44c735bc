//! One JSON object per event.

use crate::redact::{is_sensitive_field, REDACTED};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// A written log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    /// RFC 3339, microseconds, UTC.
    pub timestamp: String,
    pub level: &'static str,
    pub service: String,
    pub pid: u32,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Default)]
struct EventFields {
    message: String,
    fields: BTreeMap<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else if is_sensitive_field(name) {
            self.fields.insert(name.to_string(), Value::from(REDACTED));
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities are not JSON numbers.
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(value.to_string()));
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{:?}", value)));
    }
}

/// Layer writing every event as a [`LogLine`] to `make_writer`.
pub struct JsonlLayer<W> {
    service: String,
    pid: u32,
    make_writer: W,
}

impl<W> JsonlLayer<W> {
    pub fn new(service: impl Into<String>, make_writer: W) -> Self {
        Self {
            service: service.into(),
            pid: std::process::id(),
            make_writer,
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut collected = EventFields::default();
        event.record(&mut collected);

        let meta = event.metadata();
        let line = LogLine {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            level: meta.level().as_str(),
            service: self.service.clone(),
            pid: self.pid,
            target: meta.target().to_string(),
            message: collected.message,
            fields: collected.fields,
            span: ctx.event_span(event).map(|span| span.name().to_string()),
            location: meta
                .file()
                .map(|file| format!("{}:{}", file, meta.line().unwrap_or(0))),
        };

        if let Ok(json) = serde_json::to_string(&line) {
            let mut out = self.make_writer.make_writer();
            let _ = writeln!(out, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn lines_from(f: impl FnOnce()) -> Vec<Value> {
        let captured = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(JsonlLayer::new("test-service", captured.clone()));
        tracing::subscriber::with_default(subscriber, f);

        let bytes = captured.0.lock().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn one_line_per_event_with_typed_fields() {
        let lines = lines_from(|| {
            tracing::info!(command = "shortcut-01", "command received");
            tracing::warn!(dots = 7u64, safe = false, "url rejected");
        });

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "INFO");
        assert_eq!(lines[0]["service"], "test-service");
        assert_eq!(lines[0]["message"], "command received");
        assert_eq!(lines[0]["fields"]["command"], "shortcut-01");
        assert_eq!(lines[1]["level"], "WARN");
        assert_eq!(lines[1]["fields"]["dots"], 7);
        assert_eq!(lines[1]["fields"]["safe"], false);
    }

    #[test]
    fn sensitive_fields_are_redacted() {
        let lines = lines_from(|| {
            tracing::info!(license_key = "ABCD-1234", host = "example.com", "activating");
        });

        assert_eq!(lines[0]["fields"]["license_key"], REDACTED);
        assert_eq!(lines[0]["fields"]["host"], "example.com");
    }

    #[test]
    fn events_without_fields_omit_the_object() {
        let lines = lines_from(|| tracing::debug!("plain"));
        assert!(lines[0].get("fields").is_none());
        assert!(lines[0]["location"].as_str().unwrap().contains("json_layer.rs"));
    }
}
