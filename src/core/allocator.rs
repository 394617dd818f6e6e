//! Bucket allocation: one active bucket per resident.
//!
//! A claim runs as a small saga over three records:
//!
//! 1. reserve the resident (`bucket_id: None -> Some(candidate)`),
//! 2. claim the bucket (`active: false -> true`),
//! 3. resolve the assignment.
//!
//! Steps 1 and 2 are conditional updates, so concurrent claimants observe a
//! failed precondition instead of overwriting each other. If step 2 loses a
//! race the reservation is undone; if step 3 fails both writes are undone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::audit::AuditTrail;
use crate::core::model::{Bucket, BucketPatch, Resident, ResidentPatch};
use crate::core::resolver::{AssignmentResolver, ResolvedAssignment};
use crate::core::store::{Entity, EntityStore, Filter, Stores};
use crate::core::{AllocationError, StoreError};
use crate::util::{AssignmentId, BucketId, Principal, ResidentId};

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimedBucket {
    /// The bucket now bound to the resident.
    pub bucket: Bucket,
    /// The assignment resolved by the claim.
    pub assignment: ResolvedAssignment,
}

/// Enforces one-bucket-per-resident and performs claim transitions.
#[derive(Clone)]
pub struct BucketAllocator {
    residents: Arc<dyn EntityStore<Resident>>,
    buckets: Arc<dyn EntityStore<Bucket>>,
    resolver: AssignmentResolver,
    audit: AuditTrail,
}

impl BucketAllocator {
    /// Build from the injected stores and resolver.
    pub fn new(stores: &Stores, resolver: AssignmentResolver, audit: AuditTrail) -> Self {
        Self {
            residents: Arc::clone(&stores.residents),
            buckets: Arc::clone(&stores.buckets),
            resolver,
            audit,
        }
    }

    /// Claim an available bucket for `resident_id` and resolve `assignment_id`
    /// as `actor`. Conflicts are returned to the caller; nothing is retried.
    pub async fn claim_bucket(
        &self,
        resident_id: ResidentId,
        assignment_id: AssignmentId,
        actor: &Principal,
    ) -> Result<ClaimedBucket, AllocationError> {
        let resident = self
            .residents
            .find_by_id(resident_id)
            .await?
            .ok_or(StoreError::NotFound {
                kind: Resident::KIND,
                id: resident_id,
            })?;

        if resident.bucket_id.is_some() || self.bound_bucket(resident_id).await?.is_some() {
            tracing::warn!(%resident_id, "claim rejected: resident already has a bucket");
            return Err(AllocationError::AlreadyAssigned { resident_id });
        }

        let Some(candidate) = self.buckets.find_one(&Filter::by(Bucket::is_available)).await?
        else {
            tracing::warn!(%resident_id, "claim rejected: bucket pool exhausted");
            return Err(AllocationError::PoolExhausted);
        };

        self.reserve_resident(resident_id, candidate.id).await?;

        let bucket = match self
            .buckets
            .update_if(
                candidate.id,
                &Filter::by(Bucket::is_available),
                BucketPatch::Claim(resident_id),
            )
            .await
        {
            Ok(bucket) => bucket,
            Err(err) => {
                tracing::warn!(
                    %resident_id,
                    bucket_id = %candidate.id,
                    error = %err,
                    "bucket claim lost"
                );
                self.unbind_resident(resident_id, candidate.id).await;
                return Err(AllocationError::UpdateConflict {
                    bucket_id: candidate.id,
                    reason: err.to_string(),
                });
            }
        };

        tracing::info!(%resident_id, bucket_id = %bucket.id, "bucket claimed");
        self.audit.record(
            Bucket::KIND,
            bucket.id,
            &actor.id.to_string(),
            "claim",
            Some(resident_id.to_string()),
        );

        match self.resolver.resolve(assignment_id, actor.id).await {
            Ok(assignment) => Ok(ClaimedBucket { bucket, assignment }),
            Err(err) => {
                tracing::warn!(
                    %resident_id,
                    %assignment_id,
                    error = %err,
                    "assignment resolution failed, rolling back bucket claim"
                );
                self.rollback_claim(resident_id, bucket.id, actor).await;
                Err(err.into())
            }
        }
    }

    /// Return the resident's bucket to the available pool.
    ///
    /// Returns `Ok(None)` when the resident holds no bucket.
    pub async fn release_bucket(
        &self,
        resident_id: ResidentId,
        actor: &Principal,
    ) -> Result<Option<Bucket>, AllocationError> {
        let Some(bucket) = self.bound_bucket(resident_id).await? else {
            return Ok(None);
        };

        let released = match self
            .buckets
            .update_if(
                bucket.id,
                &Filter::by(move |b: &Bucket| b.resident_id == Some(resident_id)),
                BucketPatch::Release,
            )
            .await
        {
            Ok(released) => released,
            Err(StoreError::PreconditionFailed { .. }) => return Ok(None),
            Err(err) => {
                return Err(AllocationError::UpdateConflict {
                    bucket_id: bucket.id,
                    reason: err.to_string(),
                })
            }
        };
        self.unbind_resident(resident_id, bucket.id).await;

        tracing::info!(%resident_id, bucket_id = %released.id, "bucket released");
        self.audit.record(
            Bucket::KIND,
            released.id,
            &actor.id.to_string(),
            "release",
            Some(resident_id.to_string()),
        );
        Ok(Some(released))
    }

    async fn bound_bucket(&self, resident_id: ResidentId) -> Result<Option<Bucket>, StoreError> {
        self.buckets
            .find_one(&Filter::by(move |b: &Bucket| b.resident_id == Some(resident_id)))
            .await
    }

    async fn reserve_resident(
        &self,
        resident_id: ResidentId,
        bucket_id: BucketId,
    ) -> Result<(), AllocationError> {
        match self
            .residents
            .update_if(
                resident_id,
                &Filter::by(|r: &Resident| r.bucket_id.is_none()),
                ResidentPatch::BindBucket(bucket_id),
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(StoreError::PreconditionFailed { .. }) => {
                tracing::warn!(%resident_id, "claim rejected: concurrent claim reserved resident");
                Err(AllocationError::AlreadyAssigned { resident_id })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn unbind_resident(&self, resident_id: ResidentId, bucket_id: BucketId) {
        let guard = Filter::by(move |r: &Resident| r.bucket_id == Some(bucket_id));
        match self
            .residents
            .update_if(resident_id, &guard, ResidentPatch::ClearBucket)
            .await
        {
            Ok(_) | Err(StoreError::PreconditionFailed { .. }) => {}
            Err(err) => {
                tracing::error!(%resident_id, %bucket_id, error = %err, "failed to clear resident bucket");
            }
        }
    }

    async fn rollback_claim(&self, resident_id: ResidentId, bucket_id: BucketId, actor: &Principal) {
        let guard = Filter::by(move |b: &Bucket| b.resident_id == Some(resident_id));
        match self
            .buckets
            .update_if(bucket_id, &guard, BucketPatch::Release)
            .await
        {
            Ok(_) => {
                self.audit.record(
                    Bucket::KIND,
                    bucket_id,
                    &actor.id.to_string(),
                    "release",
                    Some("rollback".into()),
                );
            }
            Err(err) => {
                tracing::error!(%resident_id, %bucket_id, error = %err, "failed to roll back bucket claim");
            }
        }
        self.unbind_resident(resident_id, bucket_id).await;
    }
}
