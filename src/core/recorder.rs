//! Collection event recording.

use std::sync::Arc;

use uuid::Uuid;

use crate::core::audit::AuditTrail;
use crate::core::model::{
    Bucket, CollectionEvent, Ledger, LedgerPatch, Recycler, Resident, Scale,
};
use crate::core::store::{Entity, EntityStore, Filter, Stores};
use crate::core::weight::WeightSource;
use crate::core::{RecordError, StoreError};
use crate::util::clock::now;
use crate::util::{RecyclerId, ResidentId};

/// Appends weighed collection events to per-resident ledgers.
#[derive(Clone)]
pub struct CollectionRecorder {
    residents: Arc<dyn EntityStore<Resident>>,
    buckets: Arc<dyn EntityStore<Bucket>>,
    recyclers: Arc<dyn EntityStore<Recycler>>,
    scales: Arc<dyn EntityStore<Scale>>,
    ledgers: Arc<dyn EntityStore<Ledger>>,
    weights: Arc<dyn WeightSource>,
    audit: AuditTrail,
}

impl CollectionRecorder {
    /// Build from the injected stores and weight source.
    pub fn new(stores: &Stores, weights: Arc<dyn WeightSource>, audit: AuditTrail) -> Self {
        Self {
            residents: Arc::clone(&stores.residents),
            buckets: Arc::clone(&stores.buckets),
            recyclers: Arc::clone(&stores.recyclers),
            scales: Arc::clone(&stores.scales),
            ledgers: Arc::clone(&stores.ledgers),
            weights,
            audit,
        }
    }

    /// Weigh the resident's bucket on the acting recycler's scale and append
    /// the reading to the resident's ledger.
    ///
    /// All lookups and the weight reading happen before the first write, so a
    /// failure never leaves a ledger or a partial event behind.
    pub async fn record_event(
        &self,
        resident_id: ResidentId,
        recycler_id: RecyclerId,
    ) -> Result<CollectionEvent, RecordError> {
        let bucket = self.resident_bucket(resident_id).await?;
        let scale = self.recycler_scale(recycler_id).await?;

        let weight_kg = self
            .weights
            .read(&bucket, &scale)
            .await
            .map_err(|e| RecordError::InvalidWeight(e.to_string()))?;
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(RecordError::InvalidWeight(format!(
                "reading must be a positive number of kilograms, got {weight_kg}"
            )));
        }

        let (ledger, created) = self
            .ledgers
            .find_or_create(
                &Filter::by(move |l: &Ledger| l.resident_id == resident_id),
                Ledger::for_resident(resident_id),
            )
            .await?;
        if created {
            tracing::debug!(%resident_id, ledger_id = %ledger.id, "ledger created");
        }

        let event = CollectionEvent {
            id: Uuid::new_v4(),
            bucket_id: bucket.id,
            recycler_id,
            scale_id: scale.id,
            register_at: now(),
            weight_kg,
        };
        self.ledgers
            .update(ledger.id, LedgerPatch::Append(event.clone()))
            .await?;

        tracing::info!(
            %resident_id,
            bucket_id = %bucket.id,
            scale_id = %scale.id,
            weight_kg,
            "collection event recorded"
        );
        self.audit.record(
            Ledger::KIND,
            ledger.id,
            &recycler_id.to_string(),
            "record",
            Some(event.id.to_string()),
        );
        Ok(event)
    }

    async fn resident_bucket(&self, resident_id: ResidentId) -> Result<Bucket, RecordError> {
        let resident = self
            .residents
            .find_by_id(resident_id)
            .await?
            .ok_or(StoreError::NotFound {
                kind: Resident::KIND,
                id: resident_id,
            })?;
        let Some(bucket_id) = resident.bucket_id else {
            return Err(RecordError::ResidentHasNoBucket { resident_id });
        };
        match self.buckets.find_by_id(bucket_id).await? {
            Some(bucket) if bucket.active && bucket.resident_id == Some(resident_id) => Ok(bucket),
            _ => Err(RecordError::ResidentHasNoBucket { resident_id }),
        }
    }

    async fn recycler_scale(&self, recycler_id: RecyclerId) -> Result<Scale, RecordError> {
        if self.recyclers.find_by_id(recycler_id).await?.is_none() {
            return Err(StoreError::NotFound {
                kind: Recycler::KIND,
                id: recycler_id,
            }
            .into());
        }
        self.scales
            .find_one(&Filter::by(move |s: &Scale| s.recycler_id == recycler_id))
            .await?
            .ok_or(RecordError::RecyclerHasNoScale { recycler_id })
    }
}
