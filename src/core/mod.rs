//! Allocation, resolution and collection ledger components.

pub mod allocator;
pub mod audit;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod projections;
pub mod recorder;
pub mod resolver;
pub mod store;
pub mod weight;

pub use allocator::{BucketAllocator, ClaimedBucket};
pub use audit::{build_audit_event, AuditEvent, AuditSink, AuditTrail, InMemoryAuditSink};
pub use engine::CollectionEngine;
pub use error::{
    AllocationError, AppResult, ErrorDetail, ErrorReport, LifecycleError, RecordError,
    ResolutionError, StoreError,
};
pub use lifecycle::ResidentLifecycle;
pub use model::{
    Assignment, AssignmentPatch, AssignmentStatus, Bucket, BucketPatch, CollectionEvent,
    Community, Ledger, LedgerPatch, Recycler, Resident, ResidentPatch, Scale,
};
pub use projections::{
    CollectionSummary, CommunitySchedule, ReadProjections, RecentCollections,
    DEFAULT_RECENT_LIMIT,
};
pub use recorder::CollectionRecorder;
pub use resolver::{AssignmentIntake, AssignmentResolver, ResolutionOutcome, ResolvedAssignment};
pub use store::{Entity, EntityStore, Filter, ReadOnly, Stores};
pub use weight::{FixedWeightSource, UniformWeightSource, WeightSource};
