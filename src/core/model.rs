//! Records owned or read by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::store::{Entity, ReadOnly};
use crate::util::{
    AssignmentId, BucketId, CollectionEventId, CommunityId, LedgerId, PrincipalId, RecyclerId,
    ResidentId, ScaleId,
};

const fn default_true() -> bool {
    true
}

/// A resident of the collection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    /// Resident id.
    pub id: ResidentId,
    /// Display name.
    pub name: String,
    /// Bucket currently bound to this resident.
    pub bucket_id: Option<BucketId>,
    /// Community the resident belongs to.
    pub community_id: CommunityId,
    /// Soft-delete flag; `false` once deactivated.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Resident {
    /// New active resident without a bucket.
    pub fn new(name: impl Into<String>, community_id: CommunityId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bucket_id: None,
            community_id,
            active: true,
        }
    }
}

/// Mutations applied to a resident record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidentPatch {
    /// Point the resident at a bucket.
    BindBucket(BucketId),
    /// Drop the bucket reference.
    ClearBucket,
    /// Soft-delete (one-way).
    Deactivate,
}

impl Entity for Resident {
    const KIND: &'static str = "resident";
    type Patch = ResidentPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &ResidentPatch) {
        match *patch {
            ResidentPatch::BindBucket(bucket_id) => self.bucket_id = Some(bucket_id),
            ResidentPatch::ClearBucket => self.bucket_id = None,
            ResidentPatch::Deactivate => self.active = false,
        }
    }
}

/// A physical collection container.
///
/// `active == true` always comes with a `resident_id`; an inactive bucket with
/// no resident is part of the available pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket id.
    pub id: BucketId,
    /// Resident holding the bucket.
    pub resident_id: Option<ResidentId>,
    /// Whether the bucket is currently claimed.
    pub active: bool,
}

impl Bucket {
    /// New bucket in the available pool.
    pub fn available() -> Self {
        Self {
            id: Uuid::new_v4(),
            resident_id: None,
            active: false,
        }
    }

    /// Whether the bucket can be claimed.
    pub const fn is_available(&self) -> bool {
        !self.active && self.resident_id.is_none()
    }
}

/// Mutations applied to a bucket record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPatch {
    /// Bind to a resident and mark active.
    Claim(ResidentId),
    /// Return to the available pool.
    Release,
}

impl Entity for Bucket {
    const KIND: &'static str = "bucket";
    type Patch = BucketPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &BucketPatch) {
        match *patch {
            BucketPatch::Claim(resident_id) => {
                self.resident_id = Some(resident_id);
                self.active = true;
            }
            BucketPatch::Release => {
                self.resident_id = None;
                self.active = false;
            }
        }
    }
}

/// Lifecycle state derived from an assignment's `active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    /// Waiting for a bucket claim to resolve it.
    Pending,
    /// Terminal.
    Resolved,
}

/// A pending task resolved by a bucket claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment id.
    pub id: AssignmentId,
    /// Principal type of the actor that created the assignment.
    pub principal_type: String,
    /// `true` while pending.
    pub active: bool,
    /// Resolving actor, set only on resolution.
    pub conciencity_id: Option<PrincipalId>,
    /// Resolution timestamp, set only on resolution.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// New pending assignment.
    pub fn pending(principal_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            principal_type: principal_type.into(),
            active: true,
            conciencity_id: None,
            resolved_at: None,
        }
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> AssignmentStatus {
        if self.active {
            AssignmentStatus::Pending
        } else {
            AssignmentStatus::Resolved
        }
    }
}

/// Mutations applied to an assignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentPatch {
    /// Pending -> Resolved.
    Resolve {
        /// Resolving actor.
        by: PrincipalId,
        /// Resolution time.
        at: DateTime<Utc>,
    },
}

impl Entity for Assignment {
    const KIND: &'static str = "assignment";
    type Patch = AssignmentPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &AssignmentPatch) {
        match *patch {
            AssignmentPatch::Resolve { by, at } => {
                self.active = false;
                self.conciencity_id = Some(by);
                self.resolved_at = Some(at);
            }
        }
    }
}

/// One weighed pickup. Immutable once appended to a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    /// Event id.
    pub id: CollectionEventId,
    /// Bucket weighed.
    pub bucket_id: BucketId,
    /// Recycler who performed the pickup.
    pub recycler_id: RecyclerId,
    /// Scale used for the reading.
    pub scale_id: ScaleId,
    /// Registration time.
    pub register_at: DateTime<Utc>,
    /// Weight in kilograms.
    pub weight_kg: f64,
}

/// Per-resident append-only collection ledger ("recolection data").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Ledger id.
    pub id: LedgerId,
    /// Owning resident; at most one ledger per resident.
    pub resident_id: ResidentId,
    /// Events in append order.
    #[serde(default)]
    pub events: Vec<CollectionEvent>,
}

impl Ledger {
    /// Empty ledger for a resident.
    pub fn for_resident(resident_id: ResidentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            resident_id,
            events: Vec::new(),
        }
    }
}

/// Ledger mutations. Events are only ever appended.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerPatch {
    /// Append one event.
    Append(CollectionEvent),
}

impl Entity for Ledger {
    const KIND: &'static str = "recolection_data";
    type Patch = LedgerPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &LedgerPatch) {
        match patch {
            LedgerPatch::Append(event) => self.events.push(event.clone()),
        }
    }
}

/// A community and its collection schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Community id.
    pub id: CommunityId,
    /// Display name.
    pub name: String,
    /// Collection schedule (free-form, e.g. `"Monday 08:00"`).
    pub date_collection: String,
}

impl Community {
    /// New community.
    pub fn new(name: impl Into<String>, date_collection: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date_collection: date_collection.into(),
        }
    }
}

impl Entity for Community {
    const KIND: &'static str = "community";
    type Patch = ReadOnly;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &ReadOnly) {
        match *patch {}
    }
}

/// A recycler performing pickups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recycler {
    /// Recycler id.
    pub id: RecyclerId,
    /// Display name.
    pub name: String,
}

impl Recycler {
    /// New recycler.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Entity for Recycler {
    const KIND: &'static str = "recycler";
    type Patch = ReadOnly;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &ReadOnly) {
        match *patch {}
    }
}

/// A scale owned by a recycler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    /// Scale id.
    pub id: ScaleId,
    /// Owning recycler.
    pub recycler_id: RecyclerId,
}

impl Scale {
    /// New scale for a recycler.
    pub fn new(recycler_id: RecyclerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            recycler_id,
        }
    }
}

impl Entity for Scale {
    const KIND: &'static str = "scale";
    type Patch = ReadOnly;

    fn id(&self) -> Uuid {
        self.id
    }

    fn apply(&mut self, patch: &ReadOnly) {
        match *patch {}
    }
}
