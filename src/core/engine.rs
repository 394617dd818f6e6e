//! Engine facade composing the allocation, resolution, recording, projection
//! and lifecycle components over one set of stores.

use std::sync::Arc;

use crate::core::allocator::{BucketAllocator, ClaimedBucket};
use crate::core::audit::AuditTrail;
use crate::core::lifecycle::ResidentLifecycle;
use crate::core::model::{Assignment, Bucket, CollectionEvent, Resident};
use crate::core::projections::{CommunitySchedule, ReadProjections, RecentCollections};
use crate::core::recorder::CollectionRecorder;
use crate::core::resolver::{AssignmentIntake, AssignmentResolver, ResolvedAssignment};
use crate::core::store::Stores;
use crate::core::weight::WeightSource;
use crate::core::{AllocationError, LifecycleError, RecordError, ResolutionError, StoreError};
use crate::util::{AssignmentId, Principal, RecyclerId, ResidentId};

/// All engine components wired to the same stores and audit trail.
///
/// Cloning is cheap; every clone shares the underlying stores.
#[derive(Clone)]
pub struct CollectionEngine {
    allocator: BucketAllocator,
    resolver: AssignmentResolver,
    intake: AssignmentIntake,
    recorder: CollectionRecorder,
    projections: ReadProjections,
    lifecycle: ResidentLifecycle,
}

impl CollectionEngine {
    /// Wire the components.
    pub fn new(
        stores: &Stores,
        weights: Arc<dyn WeightSource>,
        audit: AuditTrail,
        recent_limit: usize,
    ) -> Self {
        let resolver = AssignmentResolver::new(stores, audit.clone());
        Self {
            allocator: BucketAllocator::new(stores, resolver.clone(), audit.clone()),
            intake: AssignmentIntake::new(stores, audit.clone()),
            recorder: CollectionRecorder::new(stores, weights, audit.clone()),
            projections: ReadProjections::new(stores, recent_limit),
            lifecycle: ResidentLifecycle::new(stores, audit),
            resolver,
        }
    }

    /// Bucket allocator.
    pub const fn allocator(&self) -> &BucketAllocator {
        &self.allocator
    }

    /// Assignment resolver.
    pub const fn resolver(&self) -> &AssignmentResolver {
        &self.resolver
    }

    /// Collection event recorder.
    pub const fn recorder(&self) -> &CollectionRecorder {
        &self.recorder
    }

    /// Read projections.
    pub const fn projections(&self) -> &ReadProjections {
        &self.projections
    }

    /// Claim a bucket for a resident, resolving an assignment.
    pub async fn claim_bucket(
        &self,
        resident_id: ResidentId,
        assignment_id: AssignmentId,
        actor: &Principal,
    ) -> Result<ClaimedBucket, AllocationError> {
        self.allocator
            .claim_bucket(resident_id, assignment_id, actor)
            .await
    }

    /// Return a resident's bucket to the pool.
    pub async fn release_bucket(
        &self,
        resident_id: ResidentId,
        actor: &Principal,
    ) -> Result<Option<Bucket>, AllocationError> {
        self.allocator.release_bucket(resident_id, actor).await
    }

    /// Resolve an assignment directly.
    pub async fn resolve_assignment(
        &self,
        assignment_id: AssignmentId,
        actor: &Principal,
    ) -> Result<ResolvedAssignment, ResolutionError> {
        self.resolver.resolve(assignment_id, actor.id).await
    }

    /// Create a pending assignment on behalf of `principal`.
    pub async fn create_assignment(&self, principal: &Principal) -> Result<Assignment, StoreError> {
        self.intake.create(principal).await
    }

    /// Record a collection event for a resident by the acting recycler.
    pub async fn record_event(
        &self,
        resident_id: ResidentId,
        recycler_id: RecyclerId,
    ) -> Result<CollectionEvent, RecordError> {
        self.recorder.record_event(resident_id, recycler_id).await
    }

    /// The `n` most recent collection events of a resident.
    pub async fn last_collection_events(
        &self,
        resident_id: ResidentId,
        n: usize,
    ) -> Result<Option<RecentCollections>, StoreError> {
        self.projections
            .last_collection_events(resident_id, n)
            .await
    }

    /// The configured number of most recent collection events of a resident.
    pub async fn recent_collections(
        &self,
        resident_id: ResidentId,
    ) -> Result<Option<RecentCollections>, StoreError> {
        self.projections.recent_collections(resident_id).await
    }

    /// Collection schedule of a resident's community.
    pub async fn community_schedule(
        &self,
        resident_id: ResidentId,
    ) -> Result<Option<CommunitySchedule>, StoreError> {
        self.projections.community_schedule(resident_id).await
    }

    /// Soft-delete a resident on behalf of `actor`.
    pub async fn deactivate_resident(
        &self,
        resident_id: ResidentId,
        actor: &Principal,
    ) -> Result<Resident, LifecycleError> {
        self.lifecycle.deactivate_resident(resident_id, actor).await
    }
}
