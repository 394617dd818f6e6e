//! Entity store backends.

pub mod file;
pub mod memory;
mod records;

use std::path::Path;
use std::sync::Arc;

pub use file::FileStore;
pub use memory::InMemoryStore;

use crate::core::{
    Assignment, Bucket, Community, Ledger, Recycler, Resident, Scale, StoreError, Stores,
};

/// Empty in-memory stores for every entity kind.
pub fn in_memory_stores() -> Stores {
    Stores {
        residents: Arc::new(InMemoryStore::<Resident>::new()),
        buckets: Arc::new(InMemoryStore::<Bucket>::new()),
        assignments: Arc::new(InMemoryStore::<Assignment>::new()),
        recyclers: Arc::new(InMemoryStore::<Recycler>::new()),
        scales: Arc::new(InMemoryStore::<Scale>::new()),
        communities: Arc::new(InMemoryStore::<Community>::new()),
        ledgers: Arc::new(InMemoryStore::<Ledger>::new()),
    }
}

/// File-backed stores for every entity kind, one log per kind under `dir`.
pub fn file_stores(dir: impl AsRef<Path>) -> Result<Stores, StoreError> {
    let dir = dir.as_ref();
    Ok(Stores {
        residents: Arc::new(FileStore::<Resident>::open(dir)?),
        buckets: Arc::new(FileStore::<Bucket>::open(dir)?),
        assignments: Arc::new(FileStore::<Assignment>::open(dir)?),
        recyclers: Arc::new(FileStore::<Recycler>::open(dir)?),
        scales: Arc::new(FileStore::<Scale>::open(dir)?),
        communities: Arc::new(FileStore::<Community>::open(dir)?),
        ledgers: Arc::new(FileStore::<Ledger>::open(dir)?),
    })
}
