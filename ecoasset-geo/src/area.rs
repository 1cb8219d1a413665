//! Integer ellipsoidal polygon area.
//!
//! Rings are summed with the Chamberlain-Duquette formula on a sphere of
//! the WGS84 equatorial radius:
//!
//! ```text
//! area = |Σ (lon[i+2] - lon[i]) * sin(lat[i+1])| * R² * π / (360 * 10^9 * MAX_AMPLITUDE)
//! ```
//!
//! with indices taken modulo the ring length. Longitudes stay in fixed-point
//! degrees and the sine comes from [`crate::trig`], so the sum is exact in
//! `i128` and the only rounding is the final floor. Results are square meters.

use crate::error::{GeoError, Result};
use crate::fixed::{Position, SCALE};
use crate::geometry::{Geometry, Ring};
use crate::trig::{degrees_to_angle, sin, MAX_AMPLITUDE};

/// WGS84 equatorial radius squared, in square meters.
const RADIUS_SQUARED: u128 = 6_378_137 * 6_378_137;

/// π × 10^12.
const PI_E12: u128 = 3_141_592_653_590;

const PI_SCALE: u128 = 1_000_000_000_000;

/// A ring is valid when it has at least 4 positions and is closed.
pub fn is_valid_ring(ring: &[Position]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}

/// Area of a single ring in square meters, independent of winding direction.
pub fn ring_area(ring: &[Position]) -> Result<u64> {
    if !is_valid_ring(ring) {
        return Err(GeoError::invalid_coordinates());
    }

    let n = ring.len();
    let mut sum: i128 = 0;
    for i in 0..n {
        let lower = ring[i];
        let middle = ring[(i + 1) % n];
        let upper = ring[(i + 2) % n];
        let delta_lon = upper[0] as i128 - lower[0] as i128;
        let term = delta_lon * sin(degrees_to_angle(middle[1])) as i128;
        sum = sum.checked_add(term).ok_or(GeoError::AreaOverflow)?;
    }

    let area = sum
        .unsigned_abs()
        .checked_mul(RADIUS_SQUARED)
        .ok_or(GeoError::AreaOverflow)?
        / MAX_AMPLITUDE as u128;
    let area = area.checked_mul(PI_E12).ok_or(GeoError::AreaOverflow)?
        / (360 * SCALE as u128 * PI_SCALE);

    u64::try_from(area).map_err(|_| GeoError::AreaOverflow)
}

/// Area of a polygon: the outer ring minus every hole.
pub fn polygon_area(rings: &[Ring]) -> Result<u64> {
    let (outer, holes) = rings
        .split_first()
        .ok_or_else(|| GeoError::invalid_geometry("polygon has no rings"))?;

    let mut area = ring_area(outer)?;
    for hole in holes {
        let hole_area = ring_area(hole)?;
        area = area.checked_sub(hole_area).ok_or_else(|| {
            GeoError::invalid_geometry("polygon holes are larger than the outer ring")
        })?;
    }
    Ok(area)
}

/// Area of a multipolygon: the sum of its polygons.
pub fn multi_polygon_area(polygons: &[Vec<Ring>]) -> Result<u64> {
    polygons.iter().try_fold(0u64, |total, rings| {
        total
            .checked_add(polygon_area(rings)?)
            .ok_or(GeoError::AreaOverflow)
    })
}

/// Area of an areal geometry.
pub fn geometry_area(geom: &Geometry) -> Result<u64> {
    match geom {
        Geometry::Polygon(rings) => polygon_area(rings),
        Geometry::MultiPolygon(polygons) => multi_polygon_area(polygons),
        other => Err(GeoError::UnsupportedGeometryType(
            other.geometry_type().as_str().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::position;
    use geo::ChamberlainDuquetteArea;

    fn ring(coords: &[[f64; 2]]) -> Ring {
        coords.iter().map(|c| position(c[0], c[1])).collect()
    }

    fn food_forest() -> Ring {
        ring(&[
            [-68.8906744122505, 12.147418397582491],
            [-68.8907468318939, 12.147347599447487],
            [-68.8907213509083, 12.14723615790054],
            [-68.8905939459801, 12.147198136656193],
            [-68.89051884412766, 12.147280734524921],
            [-68.89055103063583, 12.147379065287602],
            [-68.8906744122505, 12.147418397582491],
        ])
    }

    fn feature_two() -> Ring {
        ring(&[
            [-68.8905443251133, 12.147381687440772],
            [-68.89051616191864, 12.147279423447841],
            [-68.89041021466255, 12.147224358204612],
            [-68.8903096318245, 12.147300400680368],
            [-68.8903257250786, 12.147409220047532],
            [-68.8904584944248, 12.147449863414236],
            [-68.8905443251133, 12.147381687440772],
        ])
    }

    fn feature_three() -> Ring {
        ring(&[
            [-68.8901272416115, 12.147367265597998],
            [-68.89017820358276, 12.147195514501217],
            [-68.8900186121464, 12.147116849839737],
            [-68.8899327814579, 12.147217802817746],
            [-68.8899743556976, 12.147334488679682],
            [-68.8901272416115, 12.147367265597998],
        ])
    }

    fn unit_square() -> Ring {
        ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
    }

    fn centre_hole() -> Ring {
        ring(&[
            [0.25, 0.25],
            [0.75, 0.25],
            [0.75, 0.75],
            [0.25, 0.75],
            [0.25, 0.25],
        ])
    }

    #[test]
    fn test_ring_validity() {
        let short = ring(&[
            [-68.890674, 12.147418],
            [-68.890746, 12.147347],
            [-68.890721, 12.147236],
            [-68.890593, 12.147198],
            [-68.890518, 12.14728],
            [-68.890551, 12.147379],
            [-68.890674, 12.147418],
        ]);
        assert!(is_valid_ring(&short));
        assert_eq!(ring_area(&short).unwrap(), 417);

        let mut open = short.clone();
        *open.last_mut().unwrap() = position(-68.890674, 12.147417);
        assert!(!is_valid_ring(&open));
        let err = ring_area(&open).unwrap_err();
        assert!(matches!(err, GeoError::InvalidGeometry(msg) if msg == "The coordinates are invalid"));

        let mut nudged = short.clone();
        nudged.last_mut().unwrap()[1] += 1;
        assert!(!is_valid_ring(&nudged));
        assert!(matches!(ring_area(&nudged), Err(GeoError::InvalidGeometry(_))));

        let triangle = ring(&[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]);
        assert!(!is_valid_ring(&triangle));
        assert!(!is_valid_ring(&[]));
    }

    #[test]
    fn test_direction_invariance() {
        let forward = food_forest();
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(ring_area(&forward).unwrap(), 417);
        assert_eq!(ring_area(&backward).unwrap(), 417);
    }

    #[test]
    fn test_degree_square_and_hole() {
        assert_eq!(ring_area(&unit_square()).unwrap(), 12_391_399_100);
        assert_eq!(ring_area(&centre_hole()).unwrap(), 3_097_879_283);
        assert_eq!(
            polygon_area(&[unit_square(), centre_hole()]).unwrap(),
            9_293_519_817
        );
    }

    #[test]
    fn test_area_shrinks_away_from_equator() {
        let north = ring(&[
            [10.0, 10.0],
            [11.0, 10.0],
            [11.0, 11.0],
            [10.0, 11.0],
            [10.0, 10.0],
        ]);
        let equator = ring_area(&unit_square()).unwrap();
        let shifted = ring_area(&north).unwrap();
        assert!(shifted < equator);
        assert!(shifted.abs_diff(12_184_367_915) <= 1);
    }

    #[test]
    fn test_polygon_multipolygon_equivalence() {
        let rings = vec![food_forest()];
        let polygon = polygon_area(&rings).unwrap();
        let multi = multi_polygon_area(&[rings.clone()]).unwrap();
        assert_eq!(polygon, multi);
        assert_eq!(
            geometry_area(&Geometry::Polygon(rings.clone())).unwrap(),
            geometry_area(&Geometry::MultiPolygon(vec![rings])).unwrap()
        );
    }

    #[test]
    fn test_multipolygon_summation() {
        let parts = vec![vec![food_forest()], vec![feature_two()], vec![feature_three()]];
        assert_eq!(polygon_area(&parts[1]).unwrap(), 436);
        assert_eq!(polygon_area(&parts[2]).unwrap(), 486);
        let sum: u64 = parts.iter().map(|p| polygon_area(p).unwrap()).sum();
        assert_eq!(multi_polygon_area(&parts).unwrap(), sum);
        assert_eq!(sum, 1339);
    }

    #[test]
    fn test_hole_errors() {
        let inverted = [centre_hole(), unit_square()];
        assert!(matches!(
            polygon_area(&inverted),
            Err(GeoError::InvalidGeometry(_))
        ));

        let mut bad_hole = centre_hole();
        bad_hole.pop();
        assert!(matches!(
            polygon_area(&[unit_square(), bad_hole]),
            Err(GeoError::InvalidGeometry(_))
        ));

        assert!(polygon_area(&[]).is_err());
    }

    #[test]
    fn test_bad_part_fails_multipolygon() {
        let mut open = feature_two();
        open.pop();
        let parts = vec![vec![food_forest()], vec![open]];
        assert!(matches!(
            multi_polygon_area(&parts),
            Err(GeoError::InvalidGeometry(_))
        ));
        assert_eq!(multi_polygon_area(&[]).unwrap(), 0);
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = vec![
            [0, 0],
            [4_000_000_000_000_000_000, 10 * SCALE],
            [4_000_000_000_000_000_000, 20 * SCALE],
            [0, 0],
        ];
        assert!(matches!(ring_area(&huge), Err(GeoError::AreaOverflow)));
    }

    #[test]
    fn test_non_areal_geometry_rejected() {
        let line = Geometry::LineString(unit_square());
        assert!(matches!(
            geometry_area(&line),
            Err(GeoError::UnsupportedGeometryType(t)) if t == "LineString"
        ));
    }

    #[test]
    fn test_matches_float_chamberlain_duquette() {
        for r in [food_forest(), feature_two(), feature_three()] {
            let geom = Geometry::Polygon(vec![r.clone()]);
            let expected = geom.to_geo_types().chamberlain_duquette_unsigned_area();
            let actual = ring_area(&r).unwrap() as f64;
            assert!(
                (actual - expected).abs() < 1.0,
                "integer {actual} vs float {expected}"
            );
        }
    }
}
