//! API-facing request/response models.
//!
//! The transport layer parses requests and authenticates the caller; these
//! handlers take the parsed request plus the acting principal, call the engine
//! and turn failures into `ErrorReport`s.

use serde::{Deserialize, Serialize};

use crate::core::{
    Assignment, ClaimedBucket, CollectionEngine, CollectionEvent, CommunitySchedule,
    ErrorReport, RecentCollections, Resident,
};
use crate::util::{AssignmentId, Principal, ResidentId};

/// Claim a bucket for a resident, resolving an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimBucketRequest {
    /// Resident receiving the bucket.
    pub resident_id: ResidentId,
    /// Assignment resolved by the claim.
    pub assignment_id: AssignmentId,
    /// Acting principal, credited with the resolution.
    pub principal: Principal,
}

/// Record a collection event; the principal is the acting recycler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEventRequest {
    /// Resident whose bucket was collected.
    pub resident_id: ResidentId,
    /// Acting recycler.
    pub principal: Principal,
}

/// Soft-delete a resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeactivateResidentRequest {
    /// Resident to deactivate.
    pub resident_id: ResidentId,
    /// Acting principal.
    pub principal: Principal,
}

/// Create a pending assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Requesting principal; its type is stamped on the assignment.
    pub principal: Principal,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Handle a bucket claim.
pub async fn claim_bucket(
    engine: &CollectionEngine,
    req: ClaimBucketRequest,
) -> Result<ClaimedBucket, ErrorReport> {
    engine
        .claim_bucket(req.resident_id, req.assignment_id, &req.principal)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Handle a collection event.
pub async fn record_event(
    engine: &CollectionEngine,
    req: RecordEventRequest,
) -> Result<CollectionEvent, ErrorReport> {
    engine
        .record_event(req.resident_id, req.principal.id)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Handle a resident soft-delete.
pub async fn deactivate_resident(
    engine: &CollectionEngine,
    req: DeactivateResidentRequest,
) -> Result<Resident, ErrorReport> {
    engine
        .deactivate_resident(req.resident_id, &req.principal)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Handle an assignment creation.
pub async fn create_assignment(
    engine: &CollectionEngine,
    req: CreateAssignmentRequest,
) -> Result<Assignment, ErrorReport> {
    engine
        .create_assignment(&req.principal)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Last collections of a resident; `Ok(None)` when nothing resolves.
pub async fn recent_collections(
    engine: &CollectionEngine,
    resident_id: ResidentId,
) -> Result<Option<RecentCollections>, ErrorReport> {
    engine
        .recent_collections(resident_id)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Community schedule of a resident; `Ok(None)` when nothing resolves.
pub async fn community_schedule(
    engine: &CollectionEngine,
    resident_id: ResidentId,
) -> Result<Option<CommunitySchedule>, ErrorReport> {
    engine
        .community_schedule(resident_id)
        .await
        .map_err(|e| ErrorReport::from_error(&e))
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
