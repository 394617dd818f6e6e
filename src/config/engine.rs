//! Engine configuration structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_RECENT_LIMIT;

/// Store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory stores for development/testing.
    InMemory,
    /// JSON-lines files, one per entity kind.
    File {
        /// Directory holding the logs.
        dir: PathBuf,
    },
}

/// Weight source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightSourceConfig {
    /// Uniformly random whole kilograms.
    Uniform {
        /// Lower bound (inclusive).
        min_kg: u32,
        /// Upper bound (inclusive).
        max_kg: u32,
    },
    /// Constant reading.
    Fixed {
        /// Reading in kilograms.
        kg: f64,
    },
}

impl Default for WeightSourceConfig {
    fn default() -> Self {
        Self::Uniform { min_kg: 1, max_kg: 5 }
    }
}

const fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

const fn default_audit_capacity() -> usize {
    1024
}

/// Root engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Store backend.
    pub store: StoreBackendConfig,
    /// Weight source.
    #[serde(default)]
    pub weight: WeightSourceConfig,
    /// Number of events returned by the recent collections projection.
    #[serde(default = "default_recent_limit")]
    pub recent_collections_limit: usize,
    /// Capacity of the in-memory audit buffer.
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreBackendConfig::InMemory,
            weight: WeightSourceConfig::default(),
            recent_collections_limit: default_recent_limit(),
            audit_capacity: default_audit_capacity(),
        }
    }
}

impl WeightSourceConfig {
    /// Validate the reading range.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Uniform { min_kg, max_kg } => {
                if min_kg == 0 {
                    return Err("min_kg must be greater than 0".into());
                }
                if min_kg > max_kg {
                    return Err("min_kg must not exceed max_kg".into());
                }
            }
            Self::Fixed { kg } => {
                if !kg.is_finite() || kg <= 0.0 {
                    return Err("fixed kg must be a positive number".into());
                }
            }
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), String> {
        if let StoreBackendConfig::File { dir } = &self.store {
            if dir.as_os_str().is_empty() {
                return Err("file store dir must not be empty".into());
            }
        }
        self.weight
            .validate()
            .map_err(|e| format!("weight source invalid: {e}"))?;
        if self.recent_collections_limit == 0 {
            return Err("recent_collections_limit must be greater than 0".into());
        }
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `RECOLECTION_*` environment variables, reading `.env` first.
    ///
    /// | variable                      | meaning                               |
    /// |-------------------------------|---------------------------------------|
    /// | `RECOLECTION_STORE`           | `in_memory` (default) or `file`       |
    /// | `RECOLECTION_STORE_DIR`       | log directory for the `file` backend  |
    /// | `RECOLECTION_WEIGHT_FIXED_KG` | constant reading; overrides the range |
    /// | `RECOLECTION_WEIGHT_MIN_KG`   | uniform lower bound (default 1)       |
    /// | `RECOLECTION_WEIGHT_MAX_KG`   | uniform upper bound (default 5)       |
    /// | `RECOLECTION_RECENT_LIMIT`    | recent collections size (default 4)   |
    /// | `RECOLECTION_AUDIT_CAPACITY`  | audit buffer size (default 1024)      |
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup using the `from_env` variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("RECOLECTION_STORE").as_deref() {
            None | Some("in_memory" | "memory") => StoreBackendConfig::InMemory,
            Some("file") => StoreBackendConfig::File {
                dir: lookup("RECOLECTION_STORE_DIR")
                    .ok_or("RECOLECTION_STORE_DIR is required for the file store")?
                    .into(),
            },
            Some(other) => {
                return Err(format!(
                    "RECOLECTION_STORE must be one of: in_memory, file (got `{other}`)"
                ))
            }
        };

        let weight = match lookup("RECOLECTION_WEIGHT_FIXED_KG") {
            Some(raw) => WeightSourceConfig::Fixed {
                kg: parse_var("RECOLECTION_WEIGHT_FIXED_KG", &raw)?,
            },
            None => WeightSourceConfig::Uniform {
                min_kg: parse_or(&lookup, "RECOLECTION_WEIGHT_MIN_KG", 1)?,
                max_kg: parse_or(&lookup, "RECOLECTION_WEIGHT_MAX_KG", 5)?,
            },
        };

        let cfg = Self {
            store,
            weight,
            recent_collections_limit: parse_or(
                &lookup,
                "RECOLECTION_RECENT_LIMIT",
                default_recent_limit(),
            )?,
            audit_capacity: parse_or(
                &lookup,
                "RECOLECTION_AUDIT_CAPACITY",
                default_audit_capacity(),
            )?,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{key} has an invalid value `{raw}`"))
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| parse_var(key, &raw))
}
