//! Configuration models for stores, weight sources and projections.

pub mod engine;

pub use engine::{EngineConfig, StoreBackendConfig, WeightSourceConfig};
