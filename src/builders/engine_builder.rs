//! Builders to construct a `CollectionEngine` from configuration.

use std::sync::Arc;

use anyhow::Context;

use crate::config::{EngineConfig, StoreBackendConfig, WeightSourceConfig};
use crate::core::{
    AppResult, AuditSink, AuditTrail, CollectionEngine, FixedWeightSource, InMemoryAuditSink,
    StoreError, Stores, UniformWeightSource, WeightSource,
};
use crate::infra::store::{file_stores, in_memory_stores};

/// Build the store bundle selected by `cfg`.
pub fn build_stores(cfg: &StoreBackendConfig) -> Result<Stores, StoreError> {
    match cfg {
        StoreBackendConfig::InMemory => Ok(in_memory_stores()),
        StoreBackendConfig::File { dir } => file_stores(dir),
    }
}

/// Build the weight source selected by `cfg`.
pub fn build_weight_source(cfg: &WeightSourceConfig) -> Result<Arc<dyn WeightSource>, String> {
    cfg.validate()?;
    let source: Arc<dyn WeightSource> = match *cfg {
        WeightSourceConfig::Uniform { min_kg, max_kg } => {
            Arc::new(UniformWeightSource::new(min_kg, max_kg)?)
        }
        WeightSourceConfig::Fixed { kg } => Arc::new(FixedWeightSource::new(kg)),
    };
    Ok(source)
}

/// Assembles an engine from configuration, with optional overrides for the
/// stores, weight source and audit sink.
pub struct EngineBuilder {
    config: EngineConfig,
    stores: Option<Stores>,
    weights: Option<Arc<dyn WeightSource>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl EngineBuilder {
    /// Start from a configuration.
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            stores: None,
            weights: None,
            audit: None,
        }
    }

    /// Configuration the builder was created with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Use these stores instead of building the configured backend.
    #[must_use]
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Use this weight source instead of the configured one.
    #[must_use]
    pub fn with_weight_source(mut self, weights: Arc<dyn WeightSource>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Attach an audit sink. Defaults to a bounded in-memory sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and wire the engine.
    pub fn build(self) -> AppResult<CollectionEngine> {
        self.config
            .validate()
            .map_err(|e| anyhow::anyhow!("config invalid: {e}"))?;

        let stores = match self.stores {
            Some(stores) => stores,
            None => build_stores(&self.config.store).context("failed to open entity stores")?,
        };
        let weights = match self.weights {
            Some(weights) => weights,
            None => build_weight_source(&self.config.weight).map_err(anyhow::Error::msg)?,
        };
        let audit: Arc<dyn AuditSink> = match self.audit {
            Some(audit) => audit,
            None => Arc::new(InMemoryAuditSink::new(self.config.audit_capacity)),
        };

        tracing::info!(
            store = ?self.config.store,
            recent_limit = self.config.recent_collections_limit,
            "collection engine built"
        );
        Ok(CollectionEngine::new(
            &stores,
            weights,
            AuditTrail::new(audit),
            self.config.recent_collections_limit,
        ))
    }
}
