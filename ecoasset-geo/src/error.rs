//! Error types for geometry, geohash and registry operations.

use thiserror::Error;

/// Message carried by ring validation failures.
pub const INVALID_COORDINATES: &str = "The coordinates are invalid";

/// Geospatial errors.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Ring fails the closure or minimum-vertex check, or a polygon is malformed.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Geometry type that the operation does not accept.
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// Malformed geohash string (bad character, empty or too long).
    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    /// Geohash precision outside the supported range.
    #[error("Invalid geohash precision: {0} (expected 1..=9)")]
    InvalidPrecision(u8),

    /// Area intermediate does not fit the exact integer accumulator.
    #[error("Area computation overflowed")]
    AreaOverflow,

    /// Bounding box with inverted or out-of-range bounds.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Covering would produce more cells than configured.
    #[error("Covering needs {cells} cells, limit is {max}")]
    CoveringTooLarge { cells: usize, max: usize },

    /// GeoJSON parse error.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] serde_json::Error),

    /// WKT parse error.
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// Asset id not present in the registry.
    #[error("Unknown asset: {0}")]
    UnknownAsset(u64),

    /// Asset id already registered.
    #[error("Asset already registered: {0}")]
    DuplicateAsset(u64),

    /// Registry snapshot breaks the prefix invariant.
    #[error("Invalid registry snapshot: {0}")]
    InvalidSnapshot(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeoError {
    /// Ring validation failure.
    pub fn invalid_coordinates() -> Self {
        GeoError::InvalidGeometry(INVALID_COORDINATES.to_string())
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        GeoError::InvalidGeometry(msg.into())
    }

    /// Create an invalid geohash error.
    pub fn invalid_geohash(msg: impl Into<String>) -> Self {
        GeoError::InvalidGeohash(msg.into())
    }
}

/// Result type for geospatial operations.
pub type Result<T> = std::result::Result<T, GeoError>;
