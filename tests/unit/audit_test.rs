//! Tests for audit sink

use std::sync::Arc;

use recolection_engine::core::{build_audit_event, AuditSink, AuditTrail, InMemoryAuditSink};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        "evt1",
        "bucket1",
        "bucket",
        "user1",
        "claim",
        Some("payload".to_string()),
    );

    sink.record(event);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, "evt1");
    assert_eq!(events[0].entity_id, "bucket1");
    assert_eq!(events[0].action, "claim");
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("evt1", "b1", "bucket", "user1", "claim", None));
    sink.record(build_audit_event("evt2", "b2", "bucket", "user1", "claim", None));
    sink.record(build_audit_event("evt3", "b3", "bucket", "user1", "release", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id, "evt2"); // oldest dropped
    assert_eq!(events[1].event_id, "evt3");
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        "evt1",
        "ledger1",
        "recolection_data",
        "recycler1",
        "record",
        Some("event-id".to_string()),
    );

    assert_eq!(event.event_id, "evt1");
    assert_eq!(event.entity_id, "ledger1");
    assert_eq!(event.kind, "recolection_data");
    assert_eq!(event.actor, "recycler1");
    assert_eq!(event.action, "record");
    assert_eq!(event.payload, Some("event-id".to_string()));
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_audit_trail_forwards_to_sink() {
    let sink = Arc::new(InMemoryAuditSink::new(4));
    let trail = AuditTrail::new(sink.clone());
    let id = Uuid::new_v4();

    trail.record("resident", id, "lifecycle", "deactivate", None);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity_id, id.to_string());
    assert_eq!(events[0].kind, "resident");
}

#[test]
fn test_disabled_trail_drops_events() {
    let trail = AuditTrail::disabled();
    trail.record("resident", Uuid::new_v4(), "lifecycle", "deactivate", None);
}
