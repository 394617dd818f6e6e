//! # Recolection Engine
//!
//! Race-safe allocation and ledger core for a waste-collection service.
//!
//! Residents claim physical collection buckets, each claim resolves a pending
//! assignment, and recyclers record weighed collection events against a
//! resident's bucket. The interesting part is keeping the invariants intact
//! when requests arrive concurrently:
//!
//! - **One bucket per resident**: claims reserve the resident and the bucket
//!   with conditional updates, so concurrent claims have exactly one winner.
//! - **One-way assignments**: an assignment moves from pending to resolved
//!   once, stamped with the resolving actor and time. Re-resolving is a no-op.
//! - **Claim saga**: if the assignment cannot be resolved, the bucket claim is
//!   rolled back instead of being left half-applied.
//! - **Append-only ledgers**: every collection event lands in exactly one
//!   per-resident ledger, created on first use.
//!
//! Storage is a collaborator behind the [`core::EntityStore`] trait, with
//! in-memory and JSON-lines file backends in [`infra`].
//!
//! ```rust,ignore
//! use recolection_engine::builders::EngineBuilder;
//! use recolection_engine::config::EngineConfig;
//! use recolection_engine::util::Principal;
//!
//! let engine = EngineBuilder::new(EngineConfig::from_env()?).build()?;
//! let claimed = engine.claim_bucket(resident_id, assignment_id, &actor).await?;
//! let event = engine.record_event(resident_id, recycler_id).await?;
//! let recent = engine.recent_collections(resident_id).await?;
//! ```
//!
//! For complete examples, see `tests/allocation_test.rs` and
//! `tests/collection_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Engine components, records, errors and the store seam.
pub mod core;
/// Configuration models for stores, weight sources and projections.
pub mod config;
/// Builders to construct the engine from configuration.
pub mod builders;
/// Infrastructure adapters for storage backends.
pub mod infra;
/// Request-boundary API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
