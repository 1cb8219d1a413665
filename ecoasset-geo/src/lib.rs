//! Deterministic geospatial core for ecological assets.
//!
//! This crate computes the area of drawn polygons and indexes them by
//! geohash. Every computation after input parsing is integer arithmetic on
//! fixed-point coordinates (degrees × 10^9), so the same geometry yields the
//! same area and the same index key on every platform.
//!
//! # Architecture
//!
//! ```text
//!   GeoJSON / WKT
//!        │
//!        ▼
//!   geometry (floor to fixed point)
//!        │
//!        ├──────────────► area (Chamberlain-Duquette, integer sine from trig)
//!        │
//!        ▼
//!   centroid ──► geohash ──► registry (prefix tree: cell → ordered ids)
//!                                 ▲
//!   bbox query ──► covering ──────┘
//! ```
//!
//! [`SpatialDataRegistry`] combines these into register / unregister /
//! update-topology / query operations.
//!
//! # Modules
//!
//! - [`fixed`]: Fixed-point coordinate conversion
//! - [`trig`]: Integer sine and cosine
//! - [`area`]: Ring validation and ellipsoidal area
//! - [`geohash`]: Geohash encode/decode
//! - [`geometry`]: Geometry model, GeoJSON/WKT parsing, bbox and centroid
//! - [`covering`]: Geohash coverings for bounding boxes
//! - [`registry`]: Geohash prefix-tree registry
//! - [`asset_registry`]: Asset registry facade
//! - [`config`]: Index configuration types
//! - [`error`]: Error types

pub mod area;
pub mod asset_registry;
pub mod config;
pub mod covering;
pub mod error;
pub mod fixed;
pub mod geohash;
pub mod geometry;
pub mod registry;
pub mod trig;

// Re-export key types
pub use area::{geometry_area, is_valid_ring, multi_polygon_area, polygon_area, ring_area};
pub use asset_registry::{
    AssetReceipt, AssetRecord, RegistryStats, SharedSpatialDataRegistry, SpatialDataRegistry,
};
pub use config::{CoveringConfig, IndexConfig};
pub use covering::covering_for_bbox;
pub use error::{GeoError, Result};
pub use fixed::{from_fixed, from_micro, to_fixed, to_micro, Position, SCALE};
pub use geohash::{decode, decode_bbox, encode, Geohash};
pub use geometry::{centroid, BBox, Feature, GeoJson, GeoJsonGeometry, Geometry, GeometryType};
pub use registry::{GeohashRegistry, RegistryEvent, RegistrySnapshot, SharedGeohashRegistry};
