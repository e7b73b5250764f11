//! Client event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::ClientEvent;

/// Trait for receiving client events.
///
/// `emit()` must be fast and must not block. A failure to deliver must never
/// affect the operation that produced the event.
pub trait ClientEventSink: Send + Sync {
    /// Emit a single event.
    fn emit(&self, event: ClientEvent);

    /// Emit multiple events. Calls `emit()` for each one by default.
    fn emit_batch(&self, events: Vec<ClientEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpClientEventSink;

impl ClientEventSink for NoOpClientEventSink {
    fn emit(&self, _event: ClientEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockClientEventSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl MockClientEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClientEventSink for MockClientEventSink {
    fn emit(&self, event: ClientEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpClientEventSink;
        sink.emit(ClientEvent::authentication_required("expired"));
        sink.emit_batch(vec![
            ClientEvent::AuthStateChanged { authenticated: false },
            ClientEvent::ActiveSessionsReloaded {
                bankroll_names: vec![],
            },
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockClientEventSink::new();
        assert!(sink.is_empty());

        sink.emit(ClientEvent::AuthStateChanged { authenticated: true });
        sink.emit_batch(vec![ClientEvent::authentication_required("403")]);
        assert_eq!(sink.len(), 2);
        assert!(matches!(
            sink.events()[1],
            ClientEvent::AuthenticationRequired { .. }
        ));

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ClientEvent::SessionStatusChanged {
            session_id: "s-1".into(),
            status: "paused".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_status_changed");
        assert!(event.affects_sessions());
        assert!(!ClientEvent::AuthStateChanged { authenticated: true }.affects_sessions());
    }
}
