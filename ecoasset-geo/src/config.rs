//! Index configuration types.
//!
//! Defines the geohash precision used to index assets and the limits
//! applied when covering a bounding box with geohash cells.

use crate::error::{GeoError, Result};
use crate::geohash::{MAX_PRECISION, MIN_PRECISION};
use serde::{Deserialize, Serialize};

/// Configuration for bounding-box coverings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoveringConfig {
    /// Maximum number of geohash cells a single covering may produce.
    /// Default: 4096
    pub max_cells: usize,
}

impl Default for CoveringConfig {
    fn default() -> Self {
        Self { max_cells: 4096 }
    }
}

/// Configuration for the spatial data registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Geohash precision (1-9) at which asset centroids are indexed.
    /// Default: 8 (cells of roughly 38m x 19m)
    pub precision: u8,

    /// Covering configuration for bounding-box queries.
    pub covering: CoveringConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            precision: 8,
            covering: CoveringConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Set the indexing precision.
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Set the covering configuration.
    pub fn with_covering(mut self, covering: CoveringConfig) -> Self {
        self.covering = covering;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            return Err(GeoError::InvalidPrecision(self.precision));
        }
        if self.covering.max_cells == 0 {
            return Err(GeoError::Config(
                "covering.max_cells must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
