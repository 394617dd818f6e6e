//! Identifier aliases and the acting principal carried by every request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resident identifier.
pub type ResidentId = Uuid;
/// Bucket identifier.
pub type BucketId = Uuid;
/// Assignment identifier.
pub type AssignmentId = Uuid;
/// Recycler identifier.
pub type RecyclerId = Uuid;
/// Scale identifier.
pub type ScaleId = Uuid;
/// Community identifier.
pub type CommunityId = Uuid;
/// Ledger (per-resident collection data) identifier.
pub type LedgerId = Uuid;
/// Collection event identifier.
pub type CollectionEventId = Uuid;
/// Authenticated principal identifier.
pub type PrincipalId = Uuid;

/// Authenticated actor on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier (user id from the access token).
    pub id: PrincipalId,
    /// Principal type as issued by the authentication layer (e.g. `Conciencity`).
    pub principal_type: String,
}

impl Principal {
    /// Create a principal.
    pub fn new(id: PrincipalId, principal_type: impl Into<String>) -> Self {
        Self {
            id,
            principal_type: principal_type.into(),
        }
    }
}
