//! File-backed entity store.
//!
//! Keeps the working set in memory and appends every committed record as one
//! JSON line to `<dir>/<kind>.jsonl`. On open the log is replayed (the last
//! line for an id wins) and then rewritten with one line per live record, so
//! a ledger that grew by many appends shrinks back to its latest snapshot.

use std::fs::{self, create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::core::{Entity, EntityStore, Filter, StoreError};
use crate::infra::store::records::Records;

struct FileState<E> {
    records: Records<E>,
    log: File,
}

impl<E: Entity> FileState<E> {
    /// Persist `entity`, then make it visible.
    fn persist(&mut self, entity: E) -> Result<E, StoreError> {
        let line = serde_json::to_string(&entity).map_err(|e| StoreError::Backend(e.to_string()))?;
        writeln!(self.log, "{line}").map_err(|e| StoreError::Backend(e.to_string()))?;
        self.log
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.records.commit(entity.clone());
        Ok(entity)
    }
}

/// JSON-lines backed store that survives restarts.
///
/// Every mutation appends the full record, so the log grows between opens;
/// it is compacted each time the store is opened.
pub struct FileStore<E> {
    path: PathBuf,
    state: RwLock<FileState<E>>,
}

impl<E: Entity> FileStore<E> {
    /// Open (or create) the log for `E` under `dir`, replay and compact it.
    ///
    /// An unreadable final line is a write torn by a crash and is dropped.
    /// An unreadable line anywhere else fails the open.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        create_dir_all(dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        let path = dir.join(format!("{}.jsonl", E::KIND));

        let records = if path.exists() {
            let records = replay(&path)?;
            rewrite_log(&path, &records)?;
            records
        } else {
            Records::new()
        };
        tracing::debug!(kind = E::KIND, records = records.len(), path = %path.display(), "file store opened");

        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            path,
            state: RwLock::new(FileState { records, log }),
        })
    }

    /// Path of the backing log.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for FileStore<E> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.state.read().records.get(id).cloned())
    }

    async fn find_one(&self, filter: &Filter<E>) -> Result<Option<E>, StoreError> {
        Ok(self.state.read().records.find_one(filter).cloned())
    }

    async fn find_many(&self, filter: &Filter<E>) -> Result<Vec<E>, StoreError> {
        Ok(self.state.read().records.find_many(filter))
    }

    async fn insert(&self, entity: E) -> Result<E, StoreError> {
        let mut state = self.state.write();
        let staged = state.records.stage_insert(entity)?;
        state.persist(staged)
    }

    async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, StoreError> {
        let mut state = self.state.write();
        let staged = state.records.stage_update(id, None, &patch)?;
        state.persist(staged)
    }

    async fn update_if(
        &self,
        id: Uuid,
        guard: &Filter<E>,
        patch: E::Patch,
    ) -> Result<E, StoreError> {
        let mut state = self.state.write();
        let staged = state.records.stage_update(id, Some(guard), &patch)?;
        state.persist(staged)
    }

    async fn find_or_create(
        &self,
        filter: &Filter<E>,
        defaults: E,
    ) -> Result<(E, bool), StoreError> {
        let mut state = self.state.write();
        if let Some(existing) = state.records.find_one(filter) {
            return Ok((existing.clone(), false));
        }
        let staged = state.records.stage_insert(defaults)?;
        state.persist(staged).map(|created| (created, true))
    }
}

fn replay<E: Entity>(path: &Path) -> Result<Records<E>, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::Backend(e.to_string()))?;
    let contents = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();

    let mut records = Records::new();
    for (pos, line) in lines.iter().enumerate() {
        match serde_json::from_str::<E>(line) {
            Ok(entity) => records.commit(entity),
            Err(e) if pos + 1 == lines.len() => {
                tracing::warn!(
                    kind = E::KIND,
                    path = %path.display(),
                    error = %e,
                    "dropping torn record at end of log"
                );
            }
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "{}:{}: {e}",
                    path.display(),
                    pos + 1
                )))
            }
        }
    }
    Ok(records)
}

/// Replace the log with one line per live record.
fn rewrite_log<E: Entity>(path: &Path, records: &Records<E>) -> Result<(), StoreError> {
    let tmp = path.with_extension("jsonl.tmp");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    for entity in records.iter() {
        let line = serde_json::to_string(entity).map_err(|e| StoreError::Backend(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| StoreError::Backend(e.to_string()))?;
    }
    file.sync_all()
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::Backend(e.to_string()))
}
