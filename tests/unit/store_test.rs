//! Tests for the file-backed entity store

use std::io::Write;

use recolection_engine::core::{
    Bucket, BucketPatch, CollectionEvent, EntityStore, Filter, Ledger, LedgerPatch, StoreError,
};
use recolection_engine::infra::{FileStore, InMemoryStore};
use recolection_engine::util::now;
use uuid::Uuid;

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let resident_id = Uuid::new_v4();
    let bucket = Bucket::available();

    {
        let store = FileStore::<Bucket>::open(dir.path()).unwrap();
        store.insert(bucket.clone()).await.unwrap();
        store
            .update_if(
                bucket.id,
                &Filter::by(Bucket::is_available),
                BucketPatch::Claim(resident_id),
            )
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    let reopened = FileStore::<Bucket>::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 1);
    let stored = reopened.find_by_id(bucket.id).await.unwrap().unwrap();
    assert!(stored.active);
    assert_eq!(stored.resident_id, Some(resident_id));
    assert!(reopened.path().ends_with("bucket.jsonl"));
}

#[tokio::test]
async fn test_file_store_rejected_update_is_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::<Bucket>::open(dir.path()).unwrap();
    let bucket = store.insert(Bucket::available()).await.unwrap();
    let available = Filter::by(Bucket::is_available);

    store
        .update_if(bucket.id, &available, BucketPatch::Claim(Uuid::new_v4()))
        .await
        .unwrap();
    let err = store
        .update_if(bucket.id, &available, BucketPatch::Claim(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PreconditionFailed { .. }));

    let lines = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(lines.lines().count(), 2);
}

#[tokio::test]
async fn test_file_store_ledger_append_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let resident_id = Uuid::new_v4();
    let event = CollectionEvent {
        id: Uuid::new_v4(),
        bucket_id: Uuid::new_v4(),
        recycler_id: Uuid::new_v4(),
        scale_id: Uuid::new_v4(),
        register_at: now(),
        weight_kg: 3.0,
    };

    {
        let store = FileStore::<Ledger>::open(dir.path()).unwrap();
        let (ledger, created) = store
            .find_or_create(
                &Filter::by(move |l: &Ledger| l.resident_id == resident_id),
                Ledger::for_resident(resident_id),
            )
            .await
            .unwrap();
        assert!(created);
        store
            .update(ledger.id, LedgerPatch::Append(event.clone()))
            .await
            .unwrap();
    }

    let reopened = FileStore::<Ledger>::open(dir.path()).unwrap();
    let (ledger, created) = reopened
        .find_or_create(
            &Filter::by(move |l: &Ledger| l.resident_id == resident_id),
            Ledger::for_resident(resident_id),
        )
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(ledger.events, vec![event]);
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let bucket = Bucket::available();
    let store = InMemoryStore::with_records([bucket.clone()]);
    let err = store.insert(bucket).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { kind: "bucket", .. }));
}

#[tokio::test]
async fn test_update_of_missing_record_is_not_found() {
    let store = InMemoryStore::<Bucket>::new();
    let err = store
        .update(Uuid::new_v4(), BucketPatch::Release)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_file_store_drops_torn_final_line() {
    let dir = tempfile::tempdir().unwrap();
    let bucket = Bucket::available();
    let path = {
        let store = FileStore::<Bucket>::open(dir.path()).unwrap();
        store.insert(bucket.clone()).await.unwrap();
        store.path().to_path_buf()
    };

    // Crash part-way through the next append.
    let mut log = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    write!(log, "{{\"id\":\"abc").unwrap();
    drop(log);

    let reopened = FileStore::<Bucket>::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.find_by_id(bucket.id).await.unwrap().is_some());

    // Appends after recovery land on their own line.
    let second = reopened.insert(Bucket::available()).await.unwrap();
    drop(reopened);
    let again = FileStore::<Bucket>::open(dir.path()).unwrap();
    assert_eq!(again.len(), 2);
    assert!(again.find_by_id(second.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_file_store_rejects_corruption_before_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = {
        let store = FileStore::<Bucket>::open(dir.path()).unwrap();
        store.insert(Bucket::available()).await.unwrap();
        store.path().to_path_buf()
    };
    let valid = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, format!("not json\n{valid}")).unwrap();

    let err = FileStore::<Bucket>::open(dir.path()).err().expect("open fails");
    assert!(matches!(err, StoreError::Backend(_)));
}

#[tokio::test]
async fn test_file_store_compacts_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let resident_id = Uuid::new_v4();
    let path = {
        let store = FileStore::<Ledger>::open(dir.path()).unwrap();
        let ledger = store.insert(Ledger::for_resident(resident_id)).await.unwrap();
        for _ in 0..5 {
            let event = CollectionEvent {
                id: Uuid::new_v4(),
                bucket_id: Uuid::new_v4(),
                recycler_id: Uuid::new_v4(),
                scale_id: Uuid::new_v4(),
                register_at: now(),
                weight_kg: 1.0,
            };
            store
                .update(ledger.id, LedgerPatch::Append(event))
                .await
                .unwrap();
        }
        store.path().to_path_buf()
    };
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 6);

    let reopened = FileStore::<Ledger>::open(dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    let ledger = reopened
        .find_one(&Filter::by(move |l: &Ledger| l.resident_id == resident_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ledger.events.len(), 5);
}
