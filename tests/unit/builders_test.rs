//! Tests for builder modules

use recolection_engine::builders::{build_stores, build_weight_source, EngineBuilder};
use recolection_engine::config::{EngineConfig, StoreBackendConfig, WeightSourceConfig};
use recolection_engine::core::{Bucket, Scale};
use uuid::Uuid;

#[test]
fn test_engine_builder_defaults() {
    let builder = EngineBuilder::new(EngineConfig::default());
    assert_eq!(builder.config().recent_collections_limit, 4);
    assert!(builder.build().is_ok());
}

#[test]
fn test_engine_builder_rejects_invalid_config() {
    let config = EngineConfig {
        recent_collections_limit: 0,
        ..EngineConfig::default()
    };
    let err = EngineBuilder::new(config).build().err().expect("invalid config");
    assert!(err.to_string().contains("recent_collections_limit"));
}

#[test]
fn test_build_weight_source_rejects_bad_range() {
    let cfg = WeightSourceConfig::Uniform { min_kg: 5, max_kg: 1 };
    assert!(build_weight_source(&cfg).is_err());
}

#[tokio::test]
async fn test_build_fixed_weight_source() {
    let source = build_weight_source(&WeightSourceConfig::Fixed { kg: 1.5 }).unwrap();
    let kg = source
        .read(&Bucket::available(), &Scale::new(Uuid::new_v4()))
        .await
        .unwrap();
    assert!((kg - 1.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_build_file_stores() {
    let dir = tempfile::tempdir().unwrap();
    let stores = build_stores(&StoreBackendConfig::File {
        dir: dir.path().to_path_buf(),
    })
    .unwrap();
    stores.buckets.insert(Bucket::available()).await.unwrap();
    assert!(dir.path().join("bucket.jsonl").exists());
}

#[test]
fn test_build_in_memory_stores() {
    assert!(build_stores(&StoreBackendConfig::InMemory).is_ok());
}
