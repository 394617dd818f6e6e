//! Insertion-ordered record table shared by the store backends.
//!
//! Mutations are staged on a copy first and committed afterwards, so a backend
//! can persist the staged record before it becomes visible.

use std::collections::HashMap;

use uuid::Uuid;

use crate::core::{Entity, Filter, StoreError};

pub(crate) struct Records<E> {
    entries: Vec<E>,
    index: HashMap<Uuid, usize>,
}

impl<E: Entity> Records<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter()
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<&E> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    pub(crate) fn find_one(&self, filter: &Filter<E>) -> Option<&E> {
        self.entries.iter().find(|e| filter.matches(e))
    }

    pub(crate) fn find_many(&self, filter: &Filter<E>) -> Vec<E> {
        let matching = self.entries.iter().filter(|e| filter.matches(e));
        match filter.max_results() {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        }
    }

    pub(crate) fn stage_insert(&self, entity: E) -> Result<E, StoreError> {
        if self.index.contains_key(&entity.id()) {
            return Err(StoreError::Duplicate {
                kind: E::KIND,
                id: entity.id(),
            });
        }
        Ok(entity)
    }

    pub(crate) fn stage_update(
        &self,
        id: Uuid,
        guard: Option<&Filter<E>>,
        patch: &E::Patch,
    ) -> Result<E, StoreError> {
        let current = self
            .get(id)
            .ok_or(StoreError::NotFound { kind: E::KIND, id })?;
        if let Some(guard) = guard {
            if !guard.matches(current) {
                return Err(StoreError::PreconditionFailed { kind: E::KIND, id });
            }
        }
        let mut updated = current.clone();
        updated.apply(patch);
        Ok(updated)
    }

    /// Insert or replace by id.
    pub(crate) fn commit(&mut self, entity: E) {
        match self.index.get(&entity.id()) {
            Some(&pos) => self.entries[pos] = entity,
            None => {
                self.index.insert(entity.id(), self.entries.len());
                self.entries.push(entity);
            }
        }
    }
}
