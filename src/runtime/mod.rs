//! Request-boundary API consumed by the transport layer.

pub mod api;

pub use api::{
    claim_bucket, community_schedule, create_assignment, deactivate_resident, health,
    recent_collections, record_event, ClaimBucketRequest, CreateAssignmentRequest,
    DeactivateResidentRequest, Health, RecordEventRequest,
};
