//! Geohash encoding and decoding in fixed point.
//!
//! A geohash refines a bounding box by alternating longitude/latitude
//! bisection, starting with longitude, and emits one base-32 character per
//! 5 bits. Ranges are kept in the crate's 10^9 fixed-point scale and
//! midpoints use integer division truncating toward zero, so encode and
//! decode are deterministic.
//!
//! Decoding is approximate: the returned coordinate is the midpoint of the
//! cell, which is within half a cell of any point that encodes to it.

use crate::error::{GeoError, Result};
use crate::fixed::SCALE;
use crate::geometry::BBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base-32 geohash alphabet.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Smallest supported precision (characters).
pub const MIN_PRECISION: u8 = 1;

/// Largest supported precision (characters).
pub const MAX_PRECISION: u8 = 9;

const BITS_PER_CHAR: u32 = 5;

const LAT_MIN: i64 = -90 * SCALE;
const LAT_MAX: i64 = 90 * SCALE;
const LON_MIN: i64 = -180 * SCALE;
const LON_MAX: i64 = 180 * SCALE;

/// A validated geohash string (1-9 characters of the base-32 alphabet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Geohash(String);

impl Geohash {
    /// Validate and wrap a geohash string.
    pub fn parse(s: &str) -> Result<Self> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// The geohash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters.
    pub fn precision(&self) -> u8 {
        self.0.len() as u8
    }

    /// All non-empty prefixes, shortest first, ending with the full hash.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        (1..=self.0.len()).map(move |end| &self.0[..end])
    }

    /// The enclosing cell one character shorter, if any.
    pub fn parent(&self) -> Option<Geohash> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_string()))
    }

    /// True if `self` is a prefix of (or equal to) `other`.
    pub fn contains(&self, other: &Geohash) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Midpoint of the cell as fixed-point `(lat, lon)`.
    pub fn center(&self) -> (i64, i64) {
        let (lat, lon) = bisect(self.0.as_bytes());
        (midpoint(lat), midpoint(lon))
    }

    /// Bounds of the cell.
    pub fn bbox(&self) -> BBox {
        let (lat, lon) = bisect(self.0.as_bytes());
        BBox::new(lat[0], lon[0], lat[1], lon[1])
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Geohash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Geohash {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Geohash {
    type Error = GeoError;

    fn try_from(s: String) -> Result<Self> {
        validate(&s)?;
        Ok(Self(s))
    }
}

impl From<Geohash> for String {
    fn from(g: Geohash) -> Self {
        g.0
    }
}

/// Encode a fixed-point `(lat, lon)` into a geohash of `precision` characters.
///
/// Coordinates are not range checked; values beyond the world bounds
/// saturate into the edge cells.
pub fn encode(lat: i64, lon: i64, precision: u8) -> Result<Geohash> {
    check_precision(precision)?;

    let mut lat_range = [LAT_MIN, LAT_MAX];
    let mut lon_range = [LON_MIN, LON_MAX];
    let mut is_lon = true;
    let mut out = String::with_capacity(precision as usize);

    for _ in 0..precision {
        let mut idx = 0usize;
        for _ in 0..BITS_PER_CHAR {
            let (range, value) = if is_lon {
                (&mut lon_range, lon)
            } else {
                (&mut lat_range, lat)
            };
            let mid = midpoint(*range);
            idx <<= 1;
            if value >= mid {
                idx |= 1;
                range[0] = mid;
            } else {
                range[1] = mid;
            }
            is_lon = !is_lon;
        }
        out.push(BASE32[idx] as char);
    }

    Ok(Geohash(out))
}

/// Decode a geohash into the fixed-point `(lat, lon)` midpoint of its cell.
pub fn decode(geohash: &str) -> Result<(i64, i64)> {
    validate(geohash)?;
    let (lat, lon) = bisect(geohash.as_bytes());
    Ok((midpoint(lat), midpoint(lon)))
}

/// Decode a geohash into the bounds of its cell.
pub fn decode_bbox(geohash: &str) -> Result<BBox> {
    validate(geohash)?;
    let (lat, lon) = bisect(geohash.as_bytes());
    Ok(BBox::new(lat[0], lon[0], lat[1], lon[1]))
}

/// Cell size `(lat_span, lon_span)` in fixed point at `precision`.
pub fn cell_size(precision: u8) -> Result<(i64, i64)> {
    check_precision(precision)?;
    let bits = precision as u32 * BITS_PER_CHAR;
    let lon_bits = bits.div_ceil(2);
    let lat_bits = bits / 2;
    Ok((
        (LAT_MAX - LAT_MIN) >> lat_bits,
        (LON_MAX - LON_MIN) >> lon_bits,
    ))
}

fn check_precision(precision: u8) -> Result<()> {
    if (MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(GeoError::InvalidPrecision(precision))
    }
}

fn validate(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(GeoError::invalid_geohash("empty geohash"));
    }
    if s.len() > MAX_PRECISION as usize {
        return Err(GeoError::invalid_geohash(format!(
            "'{s}' is longer than {MAX_PRECISION} characters"
        )));
    }
    if let Some(c) = s.chars().find(|c| char_value(*c).is_none()) {
        return Err(GeoError::invalid_geohash(format!(
            "'{s}' contains invalid character '{c}'"
        )));
    }
    Ok(())
}

fn char_value(c: char) -> Option<usize> {
    if !c.is_ascii() {
        return None;
    }
    BASE32.iter().position(|&b| b == c as u8)
}

/// Replay bisection for already-validated bytes, returning the final
/// `([lat_lo, lat_hi], [lon_lo, lon_hi])`.
fn bisect(bytes: &[u8]) -> ([i64; 2], [i64; 2]) {
    let mut lat_range = [LAT_MIN, LAT_MAX];
    let mut lon_range = [LON_MIN, LON_MAX];
    let mut is_lon = true;

    for &b in bytes {
        let value = char_value(b as char).unwrap_or(0);
        for shift in (0..BITS_PER_CHAR).rev() {
            let range = if is_lon {
                &mut lon_range
            } else {
                &mut lat_range
            };
            let mid = midpoint(*range);
            if (value >> shift) & 1 == 1 {
                range[0] = mid;
            } else {
                range[1] = mid;
            }
            is_lon = !is_lon;
        }
    }

    (lat_range, lon_range)
}

fn midpoint(range: [i64; 2]) -> i64 {
    (range[0] + range[1]) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::to_fixed;

    #[test]
    fn test_encode_prefix_growth() {
        let lat = to_fixed(12.194946);
        let lon = to_fixed(-69.011151);
        let expected = "d6nvms58e";
        for precision in 1..=9u8 {
            let hash = encode(lat, lon, precision).unwrap();
            assert_eq!(hash.as_str(), &expected[..precision as usize]);
        }
    }

    #[test]
    fn test_encode_mirrored_point() {
        let lat = to_fixed(-12.194946);
        let lon = to_fixed(69.011151);
        assert_eq!(encode(lat, lon, 9).unwrap().as_str(), "mtc4d7urk");
    }

    #[test]
    fn test_decode_fixture() {
        let (lat, lon) = decode("d6nvms58").unwrap();
        assert_eq!(lat, 12_194_910_048);
        assert_eq!(lon, -69_011_135_100);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(decode(""), Err(GeoError::InvalidGeohash(_))));
        assert!(matches!(decode("d6a"), Err(GeoError::InvalidGeohash(_))));
        assert!(matches!(decode("D6N"), Err(GeoError::InvalidGeohash(_))));
        assert!(matches!(
            decode("d6nvms58ee"),
            Err(GeoError::InvalidGeohash(_))
        ));
        assert!(matches!(decode("d6é"), Err(GeoError::InvalidGeohash(_))));
    }

    #[test]
    fn test_encode_rejects_precision() {
        assert!(matches!(encode(0, 0, 0), Err(GeoError::InvalidPrecision(0))));
        assert!(matches!(
            encode(0, 0, 10),
            Err(GeoError::InvalidPrecision(10))
        ));
    }

    #[test]
    fn test_roundtrip_within_cell() {
        let points = [
            (12.194946, -69.011151),
            (-33.8688, 151.2093),
            (51.5074, -0.1278),
            (-89.9, 179.9),
            (0.0, 0.0),
        ];
        for (lat, lon) in points {
            let (lat, lon) = (to_fixed(lat), to_fixed(lon));
            for precision in 1..=9u8 {
                let hash = encode(lat, lon, precision).unwrap();
                let (dlat, dlon) = decode(hash.as_str()).unwrap();
                let (lat_span, lon_span) = cell_size(precision).unwrap();
                assert!((dlat - lat).abs() <= lat_span / 2 + 2, "{hash} lat");
                assert!((dlon - lon).abs() <= lon_span / 2 + 2, "{hash} lon");
                assert!(hash.bbox().contains(lat, lon), "{hash} bbox");
            }
        }
    }

    #[test]
    fn test_monotonic_in_latitude() {
        let lon = to_fixed(10.0);
        let mut previous = encode(to_fixed(-80.0), lon, 6).unwrap();
        for step in 1..16 {
            let lat = to_fixed(-80.0 + step as f64 * 10.0);
            let current = encode(lat, lon, 6).unwrap();
            let (prev_lat, _) = previous.center();
            let (cur_lat, _) = current.center();
            assert!(cur_lat >= prev_lat);
            previous = current;
        }
    }

    #[test]
    fn test_prefixes_and_parent() {
        let hash = Geohash::parse("gc7j98fg").unwrap();
        let prefixes: Vec<&str> = hash.prefixes().collect();
        assert_eq!(prefixes.first(), Some(&"g"));
        assert_eq!(prefixes.last(), Some(&"gc7j98fg"));
        assert_eq!(prefixes.len(), 8);
        assert_eq!(hash.parent().unwrap().as_str(), "gc7j98f");
        assert!(Geohash::parse("g").unwrap().parent().is_none());
        assert!(Geohash::parse("gc7").unwrap().contains(&hash));
    }

    #[test]
    fn test_bbox_matches_decode() {
        let bbox = decode_bbox("d6nvms58").unwrap();
        let (lat, lon) = decode("d6nvms58").unwrap();
        assert!(bbox.contains(lat, lon));
        assert_eq!((bbox.min_lat + bbox.max_lat) / 2, lat);
        assert_eq!((bbox.min_lon + bbox.max_lon) / 2, lon);
    }

    #[test]
    fn test_serde_validates() {
        let hash: Geohash = serde_json::from_str("\"d6nv\"").unwrap();
        assert_eq!(hash.as_str(), "d6nv");
        assert!(serde_json::from_str::<Geohash>("\"d6na\"").is_err());
    }
}
