//! Fixed-point coordinate encoding.
//!
//! Every coordinate handled by this crate is a degree value multiplied by
//! 10^9 and stored as `i64`. Conversion from floating point uses floor so
//! that the same input always produces the same integer, regardless of
//! platform rounding mode.

/// Fixed-point scale: 1 degree = 10^9 units.
pub const SCALE: i64 = 1_000_000_000;

/// Ratio between this crate's scale and the legacy micro-degree (10^6) scale.
const MICRO_RATIO: i64 = 1_000;

/// A `[lon, lat]` position in fixed point (GeoJSON axis order).
pub type Position = [i64; 2];

/// Convert floating-point degrees to fixed point, flooring the result.
pub fn to_fixed(degrees: f64) -> i64 {
    (degrees * SCALE as f64).floor() as i64
}

/// Convert fixed point back to floating-point degrees.
pub fn from_fixed(value: i64) -> f64 {
    value as f64 / SCALE as f64
}

/// Rescale a micro-degree (10^6) value into this crate's scale.
///
/// Values beyond `i64::MAX / 1000` in magnitude saturate at the `i64` bounds.
pub fn from_micro(value: i64) -> i64 {
    value.saturating_mul(MICRO_RATIO)
}

/// Rescale to micro-degrees, truncating toward zero.
pub fn to_micro(value: i64) -> i64 {
    value / MICRO_RATIO
}

/// Convert a floating-point `[lon, lat]` pair to a fixed-point position.
pub fn position(lon: f64, lat: f64) -> Position {
    [to_fixed(lon), to_fixed(lat)]
}
