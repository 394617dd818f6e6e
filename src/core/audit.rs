//! Audit sink implementations.
//!
//! Every successful state transition (claim, release, resolve, record,
//! deactivate, create) is written to the configured sink.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Affected record identifier.
    pub entity_id: String,
    /// Affected record kind.
    pub kind: String,
    /// Acting principal or component.
    pub actor: String,
    /// Action taken (claim, release, resolve, record, deactivate, create).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: Mutex<VecDeque<AuditEvent>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    event_id: impl Into<String>,
    entity_id: impl Into<String>,
    kind: impl Into<String>,
    actor: impl Into<String>,
    action: impl Into<String>,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: event_id.into(),
        entity_id: entity_id.into(),
        kind: kind.into(),
        actor: actor.into(),
        action: action.into(),
        created_at_ms: now_ms(),
        payload,
    }
}

/// Optional shared sink handle held by the engine components.
#[derive(Clone, Default)]
pub struct AuditTrail {
    sink: Option<Arc<dyn AuditSink>>,
}

impl AuditTrail {
    /// Trail writing to `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Trail that drops every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Record a transition if a sink is attached.
    pub fn record(
        &self,
        kind: &str,
        entity_id: Uuid,
        actor: &str,
        action: &str,
        payload: Option<String>,
    ) {
        if let Some(sink) = &self.sink {
            sink.record(build_audit_event(
                Uuid::new_v4().to_string(),
                entity_id.to_string(),
                kind,
                actor,
                action,
                payload,
            ));
        }
    }
}
