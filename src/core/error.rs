//! Error types for allocation, resolution, recording and lifecycle operations.
//!
//! Every error carries a machine-readable code, a short name and a human
//! message (its `Display`), plus the HTTP-equivalent status the request
//! boundary should answer with.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::util::{AssignmentId, BucketId, RecyclerId, ResidentId};

/// Errors surfaced by an entity store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record of `kind` with this id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind.
        kind: &'static str,
        /// Record id.
        id: Uuid,
    },
    /// Conditional update rejected because the record changed since it was read.
    #[error("{kind} {id} no longer satisfies the update precondition")]
    PreconditionFailed {
        /// Entity kind.
        kind: &'static str,
        /// Record id.
        id: Uuid,
    },
    /// Insert of an id that already exists.
    #[error("{kind} {id} already exists")]
    Duplicate {
        /// Entity kind.
        kind: &'static str,
        /// Record id.
        id: Uuid,
    },
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Failures of the bucket claim operation.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The resident already holds a bucket.
    #[error("resident {resident_id} already has one bucket associated")]
    AlreadyAssigned {
        /// Resident that attempted the claim.
        resident_id: ResidentId,
    },
    /// No available bucket left in the pool.
    #[error("there are no more buckets registered in the system, please contact the administrator")]
    PoolExhausted,
    /// The chosen bucket could not be claimed (lost a race or the write failed).
    #[error("there was an error updating bucket {bucket_id}: {reason}")]
    UpdateConflict {
        /// Bucket that could not be claimed.
        bucket_id: BucketId,
        /// Underlying store failure.
        reason: String,
    },
    /// The claim succeeded but the assignment could not be resolved; the claim was rolled back.
    #[error(transparent)]
    ResolutionFailed(#[from] ResolutionError),
    /// Lookup or infrastructure failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the assignment resolution operation.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No assignment with this id.
    #[error("assignment {assignment_id} not found")]
    NotFound {
        /// Assignment id.
        assignment_id: AssignmentId,
    },
    /// The resolving write failed.
    #[error("there was an error updating assignment {assignment_id}: {reason}")]
    UpdateFailed {
        /// Assignment id.
        assignment_id: AssignmentId,
        /// Underlying store failure.
        reason: String,
    },
    /// Lookup or infrastructure failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the collection event recorder.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The resident has no claimed bucket.
    #[error("resident {resident_id} has no bucket associated")]
    ResidentHasNoBucket {
        /// Resident id.
        resident_id: ResidentId,
    },
    /// The acting recycler has no scale.
    #[error("recycler {recycler_id} has no scale associated")]
    RecyclerHasNoScale {
        /// Recycler id.
        recycler_id: RecyclerId,
    },
    /// The weight source failed or produced a non-positive reading.
    #[error("invalid weight reading: {0}")]
    InvalidWeight(String),
    /// Lookup or infrastructure failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the resident soft-delete lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The resident was already deactivated.
    #[error("Resident {name} is not active")]
    AlreadyInactive {
        /// Resident display name.
        name: String,
    },
    /// No resident with this id.
    #[error("resident {resident_id} not found")]
    NotFound {
        /// Resident id.
        resident_id: ResidentId,
    },
    /// Lookup or infrastructure failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Machine-readable details for an error crossing the request boundary.
pub trait ErrorDetail: std::error::Error {
    /// HTTP-equivalent status code.
    fn status(&self) -> u16;
    /// Stable upper-case error code.
    fn code(&self) -> &'static str;
    /// Short human name.
    fn name(&self) -> String;
}

impl ErrorDetail for StoreError {
    fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::PreconditionFailed { .. } | Self::Duplicate { .. } => 409,
            Self::Backend(_) => 500,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PreconditionFailed { .. } => "PRECONDITION_FAILED",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::Backend(_) => "BACKEND_ERROR",
        }
    }

    fn name(&self) -> String {
        match self {
            Self::NotFound { kind, .. } => format!("{kind} not found"),
            Self::PreconditionFailed { kind, .. } => format!("{kind} changed concurrently"),
            Self::Duplicate { kind, .. } => format!("{kind} already exists"),
            Self::Backend(_) => "Entity store failure".into(),
        }
    }
}

impl ErrorDetail for AllocationError {
    fn status(&self) -> u16 {
        match self {
            Self::AlreadyAssigned { .. } | Self::PoolExhausted | Self::UpdateConflict { .. } => 409,
            Self::ResolutionFailed(e) => e.status(),
            Self::Store(e) => e.status(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyAssigned { .. } => "ALREADY_HAVE_BUCKET",
            Self::PoolExhausted => "NO_BUCKETS",
            Self::UpdateConflict { .. } => "ERROR_UPDATING_BUCKET",
            Self::ResolutionFailed(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::AlreadyAssigned { .. } => "Resident already has one bucket associated".into(),
            Self::PoolExhausted => "No more buckets registered in system".into(),
            Self::UpdateConflict { .. } => "Error updating bucket attributes".into(),
            Self::ResolutionFailed(e) => e.name(),
            Self::Store(e) => e.name(),
        }
    }
}

impl ErrorDetail for ResolutionError {
    fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::UpdateFailed { .. } => 409,
            Self::Store(e) => e.status(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UpdateFailed { .. } => "ERROR_UPDATING_ASSIGNMENT",
            Self::Store(e) => e.code(),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::NotFound { .. } => "Assignment not found".into(),
            Self::UpdateFailed { .. } => "Error updating assignment attributes".into(),
            Self::Store(e) => e.name(),
        }
    }
}

impl ErrorDetail for RecordError {
    fn status(&self) -> u16 {
        match self {
            Self::ResidentHasNoBucket { .. } | Self::RecyclerHasNoScale { .. } => 409,
            Self::InvalidWeight(_) => 422,
            Self::Store(e) => e.status(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::ResidentHasNoBucket { .. } => "RESIDENT_WITHOUT_BUCKET",
            Self::RecyclerHasNoScale { .. } => "RECYCLER_WITHOUT_SCALE",
            Self::InvalidWeight(_) => "INVALID_WEIGHT",
            Self::Store(e) => e.code(),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::ResidentHasNoBucket { .. } => "Resident has no bucket".into(),
            Self::RecyclerHasNoScale { .. } => "Recycler has no scale".into(),
            Self::InvalidWeight(_) => "Invalid weight reading".into(),
            Self::Store(e) => e.name(),
        }
    }
}

impl ErrorDetail for LifecycleError {
    fn status(&self) -> u16 {
        match self {
            Self::AlreadyInactive { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::Store(e) => e.status(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyInactive { .. } => "USER_NOT_ACTIVE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Store(e) => e.code(),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::AlreadyInactive { name } => format!("Resident {name} was already deleted"),
            Self::NotFound { .. } => "Resident not found".into(),
            Self::Store(e) => e.name(),
        }
    }
}

/// Serializable error payload handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// HTTP-equivalent status.
    pub status: u16,
    /// Machine-readable code.
    pub code: String,
    /// Short name.
    pub name: String,
    /// Human message.
    pub message: String,
}

impl ErrorReport {
    /// Build a report from any boundary error.
    pub fn from_error<E: ErrorDetail>(err: &E) -> Self {
        Self {
            status: err.status(),
            code: err.code().to_string(),
            name: err.name(),
            message: err.to_string(),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
