//! Tests for the request-boundary handlers

use recolection_engine::builders::EngineBuilder;
use recolection_engine::config::{EngineConfig, WeightSourceConfig};
use recolection_engine::core::{Bucket, CollectionEngine, Community, Recycler, Resident, Scale, Stores};
use recolection_engine::infra::in_memory_stores;
use recolection_engine::runtime::{
    claim_bucket, community_schedule, create_assignment, deactivate_resident, health,
    recent_collections, record_event, ClaimBucketRequest, CreateAssignmentRequest,
    DeactivateResidentRequest, RecordEventRequest,
};
use recolection_engine::util::Principal;
use uuid::Uuid;

fn engine() -> (CollectionEngine, Stores) {
    let stores = in_memory_stores();
    let config = EngineConfig {
        weight: WeightSourceConfig::Fixed { kg: 2.0 },
        ..EngineConfig::default()
    };
    let engine = EngineBuilder::new(config)
        .with_stores(stores.clone())
        .build()
        .expect("engine builds");
    (engine, stores)
}

#[test]
fn test_health() {
    assert!(health().ok);
}

#[tokio::test]
async fn test_claim_record_and_read_back() {
    let (engine, stores) = engine();
    let community = stores
        .communities
        .insert(Community::new("Norte", "Wednesday"))
        .await
        .unwrap();
    let resident = stores
        .residents
        .insert(Resident::new("Ana", community.id))
        .await
        .unwrap();
    stores.buckets.insert(Bucket::available()).await.unwrap();
    let recycler = stores.recyclers.insert(Recycler::new("Don Jose")).await.unwrap();
    stores.scales.insert(Scale::new(recycler.id)).await.unwrap();

    let conciencity = Principal::new(Uuid::new_v4(), "Conciencity");
    let assignment = create_assignment(
        &engine,
        CreateAssignmentRequest {
            principal: conciencity.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(assignment.principal_type, "Conciencity");
    assert!(assignment.active);

    let claimed = claim_bucket(
        &engine,
        ClaimBucketRequest {
            resident_id: resident.id,
            assignment_id: assignment.id,
            principal: conciencity.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(claimed.bucket.resident_id, Some(resident.id));
    assert_eq!(claimed.assignment.assignment.conciencity_id, Some(conciencity.id));

    let event = record_event(
        &engine,
        RecordEventRequest {
            resident_id: resident.id,
            principal: Principal::new(recycler.id, "Recycler"),
        },
    )
    .await
    .unwrap();
    assert_eq!(event.bucket_id, claimed.bucket.id);

    let recent = recent_collections(&engine, resident.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recent.events.len(), 1);
    assert_eq!(recent.events[0].recycler_name.as_deref(), Some("Don Jose"));

    let schedule = community_schedule(&engine, resident.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(schedule.date_collection, "Wednesday");
}

#[tokio::test]
async fn test_claim_with_empty_pool_reports_no_buckets() {
    let (engine, stores) = engine();
    let resident = stores
        .residents
        .insert(Resident::new("Ana", Uuid::new_v4()))
        .await
        .unwrap();
    let principal = Principal::new(Uuid::new_v4(), "Conciencity");
    let assignment = create_assignment(
        &engine,
        CreateAssignmentRequest {
            principal: principal.clone(),
        },
    )
    .await
    .unwrap();

    let report = claim_bucket(
        &engine,
        ClaimBucketRequest {
            resident_id: resident.id,
            assignment_id: assignment.id,
            principal,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(report.status, 409);
    assert_eq!(report.code, "NO_BUCKETS");
}

#[tokio::test]
async fn test_deactivate_twice_reports_user_not_active() {
    let (engine, stores) = engine();
    let resident = stores
        .residents
        .insert(Resident::new("Luis", Uuid::new_v4()))
        .await
        .unwrap();
    let request = DeactivateResidentRequest {
        resident_id: resident.id,
        principal: Principal::new(Uuid::new_v4(), "Admin"),
    };

    deactivate_resident(&engine, request.clone()).await.unwrap();
    let report = deactivate_resident(&engine, request).await.unwrap_err();
    assert_eq!(report.code, "USER_NOT_ACTIVE");
    assert_eq!(report.message, "Resident Luis is not active");
}

#[tokio::test]
async fn test_record_without_bucket_reports_conflict() {
    let (engine, stores) = engine();
    let resident = stores
        .residents
        .insert(Resident::new("Sin Balde", Uuid::new_v4()))
        .await
        .unwrap();

    let report = record_event(
        &engine,
        RecordEventRequest {
            resident_id: resident.id,
            principal: Principal::new(Uuid::new_v4(), "Recycler"),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(report.code, "RESIDENT_WITHOUT_BUCKET");
}

#[test]
fn test_requests_deserialize_from_json() {
    let resident_id = Uuid::new_v4();
    let principal_id = Uuid::new_v4();
    let json = format!(
        r#"{{"resident_id":"{resident_id}","principal":{{"id":"{principal_id}","principal_type":"Recycler"}}}}"#
    );
    let req: RecordEventRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(req.resident_id, resident_id);
    assert_eq!(req.principal.id, principal_id);
}
