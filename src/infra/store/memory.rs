//! In-memory entity store.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::core::{Entity, EntityStore, Filter, StoreError};
use crate::infra::store::records::Records;

/// In-memory store for development and testing.
///
/// Each mutation runs under a single write lock, which makes conditional
/// updates and find-or-create atomic.
pub struct InMemoryStore<E> {
    records: RwLock<Records<E>>,
}

impl<E: Entity> InMemoryStore<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records::new()),
        }
    }

    /// Create a store pre-populated with `entities`.
    pub fn with_records(entities: impl IntoIterator<Item = E>) -> Self {
        let mut records = Records::new();
        for entity in entities {
            records.commit(entity);
        }
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryStore<E> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn find_one(&self, filter: &Filter<E>) -> Result<Option<E>, StoreError> {
        Ok(self.records.read().find_one(filter).cloned())
    }

    async fn find_many(&self, filter: &Filter<E>) -> Result<Vec<E>, StoreError> {
        Ok(self.records.read().find_many(filter))
    }

    async fn insert(&self, entity: E) -> Result<E, StoreError> {
        let mut records = self.records.write();
        let staged = records.stage_insert(entity)?;
        records.commit(staged.clone());
        Ok(staged)
    }

    async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, StoreError> {
        let mut records = self.records.write();
        let staged = records.stage_update(id, None, &patch)?;
        records.commit(staged.clone());
        Ok(staged)
    }

    async fn update_if(
        &self,
        id: Uuid,
        guard: &Filter<E>,
        patch: E::Patch,
    ) -> Result<E, StoreError> {
        let mut records = self.records.write();
        let staged = records.stage_update(id, Some(guard), &patch)?;
        records.commit(staged.clone());
        Ok(staged)
    }

    async fn find_or_create(
        &self,
        filter: &Filter<E>,
        defaults: E,
    ) -> Result<(E, bool), StoreError> {
        let mut records = self.records.write();
        if let Some(existing) = records.find_one(filter) {
            return Ok((existing.clone(), false));
        }
        let staged = records.stage_insert(defaults)?;
        records.commit(staged.clone());
        Ok((staged, true))
    }
}
