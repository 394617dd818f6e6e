//! Read-only views over residents, their buckets and ledgers.
//!
//! Lookups that find nothing yield `Ok(None)`; only store failures are errors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::{Bucket, Community, Ledger, Recycler, Resident, Scale};
use crate::core::store::{EntityStore, Filter, Stores};
use crate::core::StoreError;
use crate::util::{BucketId, CollectionEventId, ResidentId, ScaleId};

/// Number of events returned by `recent_collections`.
pub const DEFAULT_RECENT_LIMIT: usize = 4;

/// One collection event enriched with the recycler's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Event id.
    pub id: CollectionEventId,
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Registration time.
    pub register_at: DateTime<Utc>,
    /// Scale used.
    pub scale_id: ScaleId,
    /// Name of the recycler owning the scale, if it still resolves.
    pub recycler_name: Option<String>,
}

/// Most recent collections for a resident's bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCollections {
    /// Resident id.
    pub resident_id: ResidentId,
    /// Resident name.
    pub resident_name: String,
    /// Bucket the events were recorded against.
    pub bucket_id: BucketId,
    /// Events, most recent first.
    pub events: Vec<CollectionSummary>,
}

/// Collection schedule of a resident's community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySchedule {
    /// Community name.
    pub community: String,
    /// Collection schedule value.
    pub date_collection: String,
}

/// Read projections.
#[derive(Clone)]
pub struct ReadProjections {
    residents: Arc<dyn EntityStore<Resident>>,
    buckets: Arc<dyn EntityStore<Bucket>>,
    ledgers: Arc<dyn EntityStore<Ledger>>,
    scales: Arc<dyn EntityStore<Scale>>,
    recyclers: Arc<dyn EntityStore<Recycler>>,
    communities: Arc<dyn EntityStore<Community>>,
    recent_limit: usize,
}

impl ReadProjections {
    /// Build from the injected stores. `recent_limit` is the `n` used by
    /// `recent_collections`.
    pub fn new(stores: &Stores, recent_limit: usize) -> Self {
        Self {
            residents: Arc::clone(&stores.residents),
            buckets: Arc::clone(&stores.buckets),
            ledgers: Arc::clone(&stores.ledgers),
            scales: Arc::clone(&stores.scales),
            recyclers: Arc::clone(&stores.recyclers),
            communities: Arc::clone(&stores.communities),
            recent_limit,
        }
    }

    /// The configured number of most recent events.
    pub async fn recent_collections(
        &self,
        resident_id: ResidentId,
    ) -> Result<Option<RecentCollections>, StoreError> {
        self.last_collection_events(resident_id, self.recent_limit)
            .await
    }

    /// The `n` most recent events recorded against the resident's bucket,
    /// newest first. `None` when the resident or its bucket cannot be found.
    pub async fn last_collection_events(
        &self,
        resident_id: ResidentId,
        n: usize,
    ) -> Result<Option<RecentCollections>, StoreError> {
        let Some(resident) = self.residents.find_by_id(resident_id).await? else {
            tracing::debug!(%resident_id, "recent collections: resident not found");
            return Ok(None);
        };
        let Some(bucket_id) = resident.bucket_id else {
            return Ok(None);
        };
        let Some(bucket) = self.buckets.find_by_id(bucket_id).await? else {
            tracing::debug!(%resident_id, %bucket_id, "recent collections: bucket not found");
            return Ok(None);
        };

        let ledger = self
            .ledgers
            .find_one(&Filter::by(move |l: &Ledger| l.resident_id == resident_id))
            .await?;
        let mut recent: Vec<_> = ledger
            .map(|l| l.events)
            .unwrap_or_default()
            .into_iter()
            .rev()
            .filter(|e| e.bucket_id == bucket.id)
            .collect();
        recent.sort_by(|a, b| b.register_at.cmp(&a.register_at));
        recent.truncate(n);

        let mut names: HashMap<ScaleId, Option<String>> = HashMap::new();
        let mut events = Vec::with_capacity(recent.len());
        for event in recent {
            let recycler_name = match names.get(&event.scale_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self.recycler_name(event.scale_id).await?;
                    names.insert(event.scale_id, name.clone());
                    name
                }
            };
            events.push(CollectionSummary {
                id: event.id,
                weight_kg: event.weight_kg,
                register_at: event.register_at,
                scale_id: event.scale_id,
                recycler_name,
            });
        }

        Ok(Some(RecentCollections {
            resident_id,
            resident_name: resident.name,
            bucket_id: bucket.id,
            events,
        }))
    }

    /// Name and schedule of the resident's community.
    pub async fn community_schedule(
        &self,
        resident_id: ResidentId,
    ) -> Result<Option<CommunitySchedule>, StoreError> {
        let Some(resident) = self.residents.find_by_id(resident_id).await? else {
            tracing::debug!(%resident_id, "community schedule: resident not found");
            return Ok(None);
        };
        let community = self.communities.find_by_id(resident.community_id).await?;
        Ok(community.map(|c| CommunitySchedule {
            community: c.name,
            date_collection: c.date_collection,
        }))
    }

    async fn recycler_name(&self, scale_id: ScaleId) -> Result<Option<String>, StoreError> {
        let Some(scale) = self.scales.find_by_id(scale_id).await? else {
            return Ok(None);
        };
        Ok(self
            .recyclers
            .find_by_id(scale.recycler_id)
            .await?
            .map(|r| r.name))
    }
}
