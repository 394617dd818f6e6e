//! Tests for error types

use recolection_engine::core::{
    AllocationError, ErrorDetail, ErrorReport, LifecycleError, RecordError, ResolutionError,
    StoreError,
};
use uuid::Uuid;

#[test]
fn test_already_assigned_error() {
    let err = AllocationError::AlreadyAssigned {
        resident_id: Uuid::nil(),
    };
    assert_eq!(err.status(), 409);
    assert_eq!(err.code(), "ALREADY_HAVE_BUCKET");
    assert_eq!(err.name(), "Resident already has one bucket associated");
}

#[test]
fn test_pool_exhausted_error() {
    let err = AllocationError::PoolExhausted;
    assert_eq!(err.status(), 409);
    assert_eq!(err.code(), "NO_BUCKETS");
    assert_eq!(
        format!("{}", err),
        "there are no more buckets registered in the system, please contact the administrator"
    );
}

#[test]
fn test_update_conflict_error() {
    let err = AllocationError::UpdateConflict {
        bucket_id: Uuid::nil(),
        reason: "lost race".to_string(),
    };
    assert_eq!(err.code(), "ERROR_UPDATING_BUCKET");
    assert!(format!("{}", err).ends_with("lost race"));
}

#[test]
fn test_resolution_failure_keeps_its_code() {
    let err = AllocationError::from(ResolutionError::UpdateFailed {
        assignment_id: Uuid::nil(),
        reason: "disk full".to_string(),
    });
    assert_eq!(err.status(), 409);
    assert_eq!(err.code(), "ERROR_UPDATING_ASSIGNMENT");
}

#[test]
fn test_store_errors_map_to_status() {
    let not_found = StoreError::NotFound {
        kind: "bucket",
        id: Uuid::nil(),
    };
    assert_eq!(not_found.status(), 404);
    assert_eq!(not_found.name(), "bucket not found");

    let backend = StoreError::Backend("connection failed".to_string());
    assert_eq!(format!("{}", backend), "backend error: connection failed");
    assert_eq!(backend.status(), 500);
    assert_eq!(RecordError::from(backend).code(), "BACKEND_ERROR");
}

#[test]
fn test_record_errors() {
    let no_bucket = RecordError::ResidentHasNoBucket {
        resident_id: Uuid::nil(),
    };
    assert_eq!(no_bucket.code(), "RESIDENT_WITHOUT_BUCKET");

    let no_scale = RecordError::RecyclerHasNoScale {
        recycler_id: Uuid::nil(),
    };
    assert_eq!(no_scale.code(), "RECYCLER_WITHOUT_SCALE");

    let weight = RecordError::InvalidWeight("scale offline".to_string());
    assert_eq!(weight.status(), 422);
    assert_eq!(weight.code(), "INVALID_WEIGHT");
}

#[test]
fn test_error_report_from_lifecycle_error() {
    let err = LifecycleError::AlreadyInactive {
        name: "Carmen".to_string(),
    };
    let report = ErrorReport::from_error(&err);
    assert_eq!(
        report,
        ErrorReport {
            status: 409,
            code: "USER_NOT_ACTIVE".to_string(),
            name: "Resident Carmen was already deleted".to_string(),
            message: "Resident Carmen is not active".to_string(),
        }
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["code"], "USER_NOT_ACTIVE");
}
