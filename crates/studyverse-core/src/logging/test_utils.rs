//! Capture tracing events in memory for assertions.
//!
//! Used by the generation and session crates to check that failures are
//! logged (and that secrets are not).

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// A captured tracing event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// The log level.
    pub level: Level,
    /// The target module.
    pub target: String,
    /// The formatted message.
    pub message: String,
    /// Field key-value pairs.
    pub fields: Vec<(String, String)>,
}

/// Thread-safe store for captured events.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// All captured events.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Whether any event contains the substring in its message.
    pub fn has_message(&self, message_contains: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.message.contains(message_contains))
    }

    /// Whether any event at `level` contains the substring in its message.
    pub fn has_event(&self, level: Level, message_contains: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(message_contains))
    }

    /// Whether any message or field value contains the substring.
    pub fn mentions(&self, needle: &str) -> bool {
        self.events.lock().iter().any(|e| {
            e.message.contains(needle) || e.fields.iter().any(|(_, v)| v.contains(needle))
        })
    }

    /// Count events at a specific level.
    pub fn count_at_level(&self, level: Level) -> usize {
        self.events.lock().iter().filter(|e| e.level == level).count()
    }

    /// Clear captured events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

struct CaptureLayer {
    logs: CapturedLogs,
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let val = format!("{value:?}");
        if field.name() == "message" {
            self.message = val;
        } else {
            self.fields.push((field.name().to_owned(), val));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut visitor);

        self.logs.events.lock().push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Install a thread-local capturing subscriber.
///
/// Keep the returned guard alive for the duration of the test.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let layer = CaptureLayer { logs: logs.clone() };

    let subscriber = tracing_subscriber::registry()
        .with(layer)
        .with(LevelFilter::TRACE);

    let guard = subscriber.set_default();
    (logs, guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_levels() {
        let (logs, _guard) = capture_logs();
        tracing::warn!("quota exceeded");
        tracing::debug!("request sent");
        assert!(logs.has_event(Level::WARN, "quota exceeded"));
        assert_eq!(logs.count_at_level(Level::DEBUG), 1);
    }

    #[test]
    fn captures_fields() {
        let (logs, _guard) = capture_logs();
        tracing::info!(model = "gemini-2.5-flash", "generating");
        let events = logs.events();
        assert_eq!(events.len(), 1);
        assert!(
            events[0]
                .fields
                .iter()
                .any(|(k, v)| k == "model" && v == "gemini-2.5-flash")
        );
        assert!(logs.mentions("gemini-2.5-flash"));
    }

    #[test]
    fn clear_resets() {
        let (logs, _guard) = capture_logs();
        tracing::info!("one");
        logs.clear();
        assert!(logs.events().is_empty());
    }
}
