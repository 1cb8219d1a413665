//! Spatial data registry for ecological assets.
//!
//! Ties the pieces together. Registering an asset:
//! 1. Computes its area (Polygon or MultiPolygon only)
//! 2. Computes its vertex centroid
//! 3. Encodes the centroid as a geohash at the configured precision
//! 4. Indexes the asset id under that geohash in a [`GeohashRegistry`]
//!
//! Assets are indexed by centroid only. A bounding-box query therefore finds
//! assets whose centroid cell lies in the covering, then keeps those whose
//! own bounding box intersects the query box.

use crate::area::geometry_area;
use crate::config::IndexConfig;
use crate::covering::covering_for_bbox;
use crate::error::{GeoError, Result};
use crate::geohash::{encode, Geohash};
use crate::geometry::{centroid, BBox, Geometry};
use crate::registry::GeohashRegistry;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything stored for one registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: u64,
    pub geometry: Geometry,
    /// Area in square meters.
    pub area: u64,
    /// Fixed-point centroid latitude.
    pub centroid_lat: i64,
    /// Fixed-point centroid longitude.
    pub centroid_lon: i64,
    pub geohash: Geohash,
    pub bbox: BBox,
}

/// What a caller needs back after registering or re-shaping an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReceipt {
    pub id: u64,
    pub geohash: Geohash,
    pub area: u64,
}

impl From<&AssetRecord> for AssetReceipt {
    fn from(record: &AssetRecord) -> Self {
        Self {
            id: record.id,
            geohash: record.geohash.clone(),
            area: record.area,
        }
    }
}

/// Counters collected over the lifetime of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Successful registrations.
    pub registered: u64,

    /// Successful unregistrations.
    pub unregistered: u64,

    /// Successful topology updates.
    pub updates: u64,

    /// Registrations or updates rejected (invalid geometry, duplicate id, ...).
    pub rejected: u64,
}

/// Registry of assets indexed by centroid geohash.
#[derive(Debug, Clone)]
pub struct SpatialDataRegistry {
    config: IndexConfig,
    index: GeohashRegistry,
    assets: FxHashMap<u64, AssetRecord>,
    /// Registration order.
    order: Vec<u64>,
    stats: RegistryStats,
}

impl SpatialDataRegistry {
    /// Create an empty registry. Fails if the configuration is invalid.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            index: GeohashRegistry::new(),
            assets: FxHashMap::default(),
            order: Vec::new(),
            stats: RegistryStats::default(),
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The underlying geohash index.
    pub fn index(&self) -> &GeohashRegistry {
        &self.index
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    /// Register a new asset.
    pub fn register(&mut self, id: u64, geometry: Geometry) -> Result<AssetReceipt> {
        if self.assets.contains_key(&id) {
            return Err(self.reject(id, GeoError::DuplicateAsset(id)));
        }
        let record = match self.describe(id, geometry) {
            Ok(record) => record,
            Err(e) => return Err(self.reject(id, e)),
        };

        self.index.add(record.geohash.as_str(), id)?;
        let receipt = AssetReceipt::from(&record);
        self.assets.insert(id, record);
        self.order.push(id);
        self.stats.registered += 1;

        tracing::debug!(
            id,
            geohash = %receipt.geohash,
            area = receipt.area,
            "registered asset"
        );
        Ok(receipt)
    }

    /// Remove an asset and return what was stored for it.
    pub fn unregister(&mut self, id: u64) -> Result<AssetRecord> {
        let record = self.assets.remove(&id).ok_or(GeoError::UnknownAsset(id))?;
        self.index.remove(record.geohash.as_str(), id)?;
        self.order.retain(|&x| x != id);
        self.stats.unregistered += 1;

        tracing::debug!(id, geohash = %record.geohash, "unregistered asset");
        Ok(record)
    }

    /// Replace the geometry of an existing asset, recomputing its area and
    /// moving it in the index in one step.
    pub fn update_topology(&mut self, id: u64, geometry: Geometry) -> Result<AssetReceipt> {
        let old_geohash = match self.assets.get(&id) {
            Some(record) => record.geohash.clone(),
            None => return Err(GeoError::UnknownAsset(id)),
        };
        let record = match self.describe(id, geometry) {
            Ok(record) => record,
            Err(e) => return Err(self.reject(id, e)),
        };

        self.index
            .update(old_geohash.as_str(), record.geohash.as_str(), id)?;
        let receipt = AssetReceipt::from(&record);
        self.assets.insert(id, record);
        self.stats.updates += 1;

        tracing::debug!(
            id,
            from = %old_geohash,
            to = %receipt.geohash,
            area = receipt.area,
            "updated asset topology"
        );
        Ok(receipt)
    }

    pub fn get(&self, id: u64) -> Option<&AssetRecord> {
        self.assets.get(&id)
    }

    /// Registered ids in registration order.
    pub fn all_ids(&self) -> &[u64] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets whose centroid falls in the same cell as `(lat, lon)` at the
    /// configured precision.
    pub fn query_point(&self, lat: i64, lon: i64) -> Result<Vec<u64>> {
        let cell = encode(lat, lon, self.config.precision)?;
        Ok(self.index.get(cell.as_str()))
    }

    /// Assets whose centroid cell is covered by `bbox` and whose bounding box
    /// intersects it.
    ///
    /// The covering uses the configured precision, falling back to coarser
    /// cells while it would exceed `covering.max_cells`.
    pub fn query_bbox(&self, bbox: &BBox) -> Result<Vec<u64>> {
        let cells = self.covering(bbox)?;
        let candidates = self.index.get_many(&cells);
        let hits: Vec<u64> = candidates
            .into_iter()
            .filter(|id| self.assets.get(id).is_some_and(|a| a.bbox.intersects(bbox)))
            .collect();

        tracing::trace!(cells = cells.len(), hits = hits.len(), "bbox query");
        Ok(hits)
    }

    fn covering(&self, bbox: &BBox) -> Result<Vec<Geohash>> {
        let mut precision = self.config.precision;
        loop {
            match covering_for_bbox(bbox, precision, &self.config.covering) {
                Err(GeoError::CoveringTooLarge { .. }) if precision > 1 => precision -= 1,
                other => return other,
            }
        }
    }

    fn describe(&self, id: u64, geometry: Geometry) -> Result<AssetRecord> {
        let area = geometry_area(&geometry)?;
        let (centroid_lat, centroid_lon) = centroid(&geometry)?;
        let geohash = encode(centroid_lat, centroid_lon, self.config.precision)?;
        let bbox = BBox::from_geometry(&geometry)
            .ok_or_else(|| GeoError::invalid_geometry("geometry has no positions"))?;
        Ok(AssetRecord {
            id,
            geometry,
            area,
            centroid_lat,
            centroid_lon,
            geohash,
            bbox,
        })
    }

    fn reject(&mut self, id: u64, error: GeoError) -> GeoError {
        self.stats.rejected += 1;
        tracing::warn!(id, error = %error, "rejected asset");
        error
    }
}

impl Default for SpatialDataRegistry {
    fn default() -> Self {
        Self {
            config: IndexConfig::default(),
            index: GeohashRegistry::new(),
            assets: FxHashMap::default(),
            order: Vec::new(),
            stats: RegistryStats::default(),
        }
    }
}

/// Thread-safe handle to a [`SpatialDataRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SharedSpatialDataRegistry {
    inner: Arc<RwLock<SpatialDataRegistry>>,
}

impl SharedSpatialDataRegistry {
    pub fn new(config: IndexConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(SpatialDataRegistry::new(config)?)),
        })
    }

    pub fn register(&self, id: u64, geometry: Geometry) -> Result<AssetReceipt> {
        self.inner.write().register(id, geometry)
    }

    pub fn unregister(&self, id: u64) -> Result<AssetRecord> {
        self.inner.write().unregister(id)
    }

    pub fn update_topology(&self, id: u64, geometry: Geometry) -> Result<AssetReceipt> {
        self.inner.write().update_topology(id, geometry)
    }

    /// Clone of the stored record.
    pub fn get(&self, id: u64) -> Option<AssetRecord> {
        self.inner.read().get(id).cloned()
    }

    pub fn query_point(&self, lat: i64, lon: i64) -> Result<Vec<u64>> {
        self.inner.read().query_point(lat, lon)
    }

    pub fn query_bbox(&self, bbox: &BBox) -> Result<Vec<u64>> {
        self.inner.read().query_bbox(bbox)
    }

    pub fn stats(&self) -> RegistryStats {
        self.inner.read().stats().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
