//! Weight reading abstraction.
//!
//! The recorder asks a `WeightSource` for the reading of a bucket on a scale.
//! Production deployments plug in a hardware or integration read; the
//! uniform source stands in for a real scale during development.

use async_trait::async_trait;
use rand::Rng;

use crate::core::model::{Bucket, Scale};
use crate::core::AppResult;

/// Source of weight readings in kilograms.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use recolection_engine::core::{AppResult, Bucket, Scale, WeightSource};
///
/// struct SerialScale { port: String }
///
/// #[async_trait]
/// impl WeightSource for SerialScale {
///     async fn read(&self, _bucket: &Bucket, _scale: &Scale) -> AppResult<f64> {
///         read_from_port(&self.port).await
///     }
/// }
/// ```
#[async_trait]
pub trait WeightSource: Send + Sync {
    /// Read the weight of `bucket` placed on `scale`.
    async fn read(&self, bucket: &Bucket, scale: &Scale) -> AppResult<f64>;
}

/// Uniformly random whole-kilogram readings in `[min_kg, max_kg]`.
#[derive(Debug, Clone, Copy)]
pub struct UniformWeightSource {
    min_kg: u32,
    max_kg: u32,
}

impl UniformWeightSource {
    /// Create a source; the range must be non-empty and start above zero.
    pub fn new(min_kg: u32, max_kg: u32) -> Result<Self, String> {
        if min_kg == 0 {
            return Err("min_kg must be greater than 0".into());
        }
        if min_kg > max_kg {
            return Err(format!("min_kg ({min_kg}) must not exceed max_kg ({max_kg})"));
        }
        Ok(Self { min_kg, max_kg })
    }
}

impl Default for UniformWeightSource {
    fn default() -> Self {
        Self { min_kg: 1, max_kg: 5 }
    }
}

#[async_trait]
impl WeightSource for UniformWeightSource {
    async fn read(&self, _bucket: &Bucket, _scale: &Scale) -> AppResult<f64> {
        let kg = rand::rng().random_range(self.min_kg..=self.max_kg);
        Ok(f64::from(kg))
    }
}

/// Constant readings, for tests and calibration runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeightSource {
    kg: f64,
}

impl FixedWeightSource {
    /// Always report `kg`.
    pub const fn new(kg: f64) -> Self {
        Self { kg }
    }
}

#[async_trait]
impl WeightSource for FixedWeightSource {
    async fn read(&self, _bucket: &Bucket, _scale: &Scale) -> AppResult<f64> {
        Ok(self.kg)
    }
}
