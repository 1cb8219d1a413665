//! Geohash coverings for bounding boxes.
//!
//! A covering is the set of geohash cells at one precision that contain at
//! least one point of the box. Cells are half-open (a point on a cell's
//! upper edge encodes into the next cell), so a box edge that lies exactly
//! on a cell boundary pulls in the neighbouring cell.
//!
//! Latitude and longitude bisection are independent, so every cell in a row
//! shares the same latitude bounds. The covering is produced row-major:
//! south to north, west to east within a row.

use crate::config::CoveringConfig;
use crate::error::{GeoError, Result};
use crate::fixed::SCALE;
use crate::geohash::{encode, Geohash};
use crate::geometry::BBox;
use tracing::debug;

const LAT_MAX: i64 = 90 * SCALE;
const LON_MAX: i64 = 180 * SCALE;

/// Cover `bbox` with geohash cells at `precision`.
///
/// Fails with [`GeoError::InvalidBoundingBox`] for inverted or out-of-range
/// boxes and with [`GeoError::CoveringTooLarge`] when more than
/// `config.max_cells` cells would be produced.
pub fn covering_for_bbox(
    bbox: &BBox,
    precision: u8,
    config: &CoveringConfig,
) -> Result<Vec<Geohash>> {
    bbox.validate()?;

    let cap = config.max_cells;
    let rows = axis_samples(bbox.min_lat, bbox.max_lat, LAT_MAX, cap, |lat| {
        let cell = encode(lat, 0, precision)?.bbox();
        Ok(cell.max_lat)
    })?;
    let cols = axis_samples(bbox.min_lon, bbox.max_lon, LON_MAX, cap, |lon| {
        let cell = encode(0, lon, precision)?.bbox();
        Ok(cell.max_lon)
    })?;

    let cells = rows.len().saturating_mul(cols.len());
    if cells > cap {
        return Err(GeoError::CoveringTooLarge { cells, max: cap });
    }

    let mut out = Vec::with_capacity(cells);
    for &lat in &rows {
        for &lon in &cols {
            out.push(encode(lat, lon, precision)?);
        }
    }

    debug!(
        precision,
        rows = rows.len(),
        cols = cols.len(),
        "bbox covering computed"
    );
    Ok(out)
}

/// One coordinate inside each cell along an axis, from `lo` up to the cell
/// containing `hi`. Stops early once more than `cap` samples exist.
fn axis_samples(
    lo: i64,
    hi: i64,
    world_max: i64,
    cap: usize,
    upper_edge: impl Fn(i64) -> Result<i64>,
) -> Result<Vec<i64>> {
    let mut samples = vec![lo];
    let mut cursor = lo;
    while samples.len() <= cap {
        let upper = upper_edge(cursor)?;
        if upper > hi || upper >= world_max {
            break;
        }
        samples.push(upper);
        cursor = upper;
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geohash::decode_bbox;

    fn world() -> BBox {
        BBox::new(-90 * SCALE, -180 * SCALE, 90 * SCALE, 180 * SCALE)
    }

    fn strings(cells: &[Geohash]) -> Vec<&str> {
        cells.iter().map(Geohash::as_str).collect()
    }

    #[test]
    fn test_world_at_precision_one() {
        let cells = covering_for_bbox(&world(), 1, &CoveringConfig::default()).unwrap();
        assert_eq!(cells.len(), 32);
        let joined: String = strings(&cells).concat();
        assert!(joined.starts_with("0145hjnp2367kmqr"));
        assert!(joined.ends_with("bcfguvyz"));
    }

    #[test]
    fn test_interior_box_single_cell() {
        let cell = decode_bbox("d6nvms5").unwrap();
        let inner = BBox::new(cell.min_lat, cell.min_lon, cell.max_lat - 1, cell.max_lon - 1);
        let cells = covering_for_bbox(&inner, 7, &CoveringConfig::default()).unwrap();
        assert_eq!(strings(&cells), vec!["d6nvms5"]);
    }

    #[test]
    fn test_edge_on_boundary_pulls_neighbours() {
        let cell = decode_bbox("d6nvms5").unwrap();
        let cells = covering_for_bbox(&cell, 7, &CoveringConfig::default()).unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].as_str(), "d6nvms5");
    }

    #[test]
    fn test_row_major_order() {
        let bbox = BBox::new(12 * SCALE, -69 * SCALE, 12_200_000_000, -68_800_000_000);
        let cells = covering_for_bbox(&bbox, 5, &CoveringConfig::default()).unwrap();
        assert!(cells.len() > 4);

        let mut seen = rustc_hash::FxHashSet::default();
        for pair in cells.windows(2) {
            let (a, b) = (pair[0].bbox(), pair[1].bbox());
            assert!(
                (a.min_lat == b.min_lat && a.max_lon == b.min_lon)
                    || (b.min_lat == a.max_lat),
                "{} -> {}",
                pair[0],
                pair[1]
            );
        }
        for cell in &cells {
            assert!(cell.bbox().intersects(&bbox));
            assert!(seen.insert(cell.clone()), "duplicate {cell}");
        }
    }

    #[test]
    fn test_rejects_bad_boxes() {
        let config = CoveringConfig::default();
        let inverted = BBox::new(SCALE, 0, 0, SCALE);
        assert!(matches!(
            covering_for_bbox(&inverted, 5, &config),
            Err(GeoError::InvalidBoundingBox(_))
        ));

        let antimeridian = BBox::new(0, 179 * SCALE, SCALE, -179 * SCALE);
        assert!(matches!(
            covering_for_bbox(&antimeridian, 5, &config),
            Err(GeoError::InvalidBoundingBox(_))
        ));

        assert!(matches!(
            covering_for_bbox(&BBox::new(0, 0, SCALE, SCALE), 10, &config),
            Err(GeoError::InvalidPrecision(10))
        ));
    }

    #[test]
    fn test_limit_enforced() {
        let err = covering_for_bbox(&world(), 5, &CoveringConfig::default()).unwrap_err();
        assert!(matches!(err, GeoError::CoveringTooLarge { max: 4096, .. }));

        let tight = CoveringConfig { max_cells: 31 };
        assert!(matches!(
            covering_for_bbox(&world(), 1, &tight),
            Err(GeoError::CoveringTooLarge { cells: 32, max: 31 })
        ));
    }
}
