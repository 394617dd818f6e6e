//! Entity store seam.
//!
//! The engine never talks to a database directly. Each component receives
//! typed `EntityStore` handles for the record kinds it touches, so a lookup
//! for "the bucket store" is resolved at construction time instead of by name
//! at runtime.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::core::model::{Assignment, Bucket, Community, Ledger, Recycler, Resident, Scale};
use crate::core::StoreError;

/// A record kind the store can persist.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Kind name used in errors, logs and backend file/table names.
    const KIND: &'static str;

    /// Field patch applied atomically by `EntityStore::update`.
    type Patch: Send + Sync + 'static;

    /// Record identifier.
    fn id(&self) -> Uuid;

    /// Apply a patch in place.
    fn apply(&mut self, patch: &Self::Patch);
}

/// Patch type for kinds this engine never mutates.
#[derive(Debug, Clone, Copy)]
pub enum ReadOnly {}

/// Typed equality/predicate filter with an optional result limit.
pub struct Filter<E> {
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
    limit: Option<usize>,
}

impl<E> Clone for Filter<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            limit: self.limit,
        }
    }
}

impl<E: 'static> Filter<E> {
    /// Match every record.
    pub fn all() -> Self {
        Self {
            predicate: Arc::new(|_: &E| true),
            limit: None,
        }
    }

    /// Match records satisfying `predicate`.
    pub fn by<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            limit: None,
        }
    }

    /// Cap the number of records returned by `find_many`.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `entity` satisfies the predicate.
    pub fn matches(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }

    /// Configured result limit, if any.
    pub const fn max_results(&self) -> Option<usize> {
        self.limit
    }
}

/// Durable record storage for one entity kind.
///
/// `update`, `update_if`, `insert` and `find_or_create` must be atomic per
/// record: concurrent `update_if` calls guarded by the same predicate have
/// exactly one winner, and losers observe `StoreError::PreconditionFailed`.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Fetch a record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError>;

    /// First record (in insertion order) matching `filter`.
    async fn find_one(&self, filter: &Filter<E>) -> Result<Option<E>, StoreError>;

    /// All records matching `filter`, honoring its limit.
    async fn find_many(&self, filter: &Filter<E>) -> Result<Vec<E>, StoreError>;

    /// Insert a new record.
    async fn insert(&self, entity: E) -> Result<E, StoreError>;

    /// Apply `patch` to record `id` and return the updated record.
    async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, StoreError>;

    /// Apply `patch` only if the current record still matches `guard`.
    async fn update_if(
        &self,
        id: Uuid,
        guard: &Filter<E>,
        patch: E::Patch,
    ) -> Result<E, StoreError>;

    /// Return the first record matching `filter`, inserting `defaults` if none
    /// exists. The flag is `true` when the record was created by this call.
    async fn find_or_create(&self, filter: &Filter<E>, defaults: E)
        -> Result<(E, bool), StoreError>;
}

/// One store handle per entity kind, injected into the engine components.
#[derive(Clone)]
pub struct Stores {
    /// Residents.
    pub residents: Arc<dyn EntityStore<Resident>>,
    /// Buckets.
    pub buckets: Arc<dyn EntityStore<Bucket>>,
    /// Assignments.
    pub assignments: Arc<dyn EntityStore<Assignment>>,
    /// Recyclers.
    pub recyclers: Arc<dyn EntityStore<Recycler>>,
    /// Scales.
    pub scales: Arc<dyn EntityStore<Scale>>,
    /// Communities.
    pub communities: Arc<dyn EntityStore<Community>>,
    /// Per-resident collection ledgers.
    pub ledgers: Arc<dyn EntityStore<Ledger>>,
}
