//! Tests for utility functions

use recolection_engine::util::{init_tracing, now, now_ms, Principal, DEFAULT_LOG_FILTER};
use uuid::Uuid;

#[test]
fn test_principal_new() {
    let id = Uuid::new_v4();
    let principal = Principal::new(id, "Recycler");
    assert_eq!(principal.id, id);
    assert_eq!(principal.principal_type, "Recycler");
}

#[test]
fn test_principal_serde_field_names() {
    let principal = Principal::new(Uuid::nil(), "Conciencity");
    let json = serde_json::to_value(&principal).unwrap();
    assert_eq!(json["principal_type"], "Conciencity");
    assert_eq!(json["id"], Uuid::nil().to_string());
}

#[test]
fn test_clock_is_past_epoch() {
    assert!(now_ms() > 0);
    assert!(now().timestamp() > 0);
}

#[test]
fn test_init_tracing_installs_once() {
    let _ = init_tracing();
    assert!(!init_tracing());
    tracing::info!(filter = DEFAULT_LOG_FILTER, "tracing initialised");
}
