//! Geometry boundary model.
//!
//! This module provides:
//! - A closed, fixed-point [`Geometry`] enum (Point through MultiPolygon)
//! - GeoJSON parsing (`Geometry`, `Feature`, `FeatureCollection`)
//! - WKT parsing via the `wkt` crate, and `geo-types` interop
//! - Bounding boxes and vertex centroids in fixed point
//!
//! # Design
//!
//! Floating-point coordinates are converted exactly once, at this boundary,
//! with [`to_fixed`]. Everything downstream (area, geohash, registry) works
//! on integers. `GeometryCollection` and unknown type tags are rejected with
//! [`GeoError::UnsupportedGeometryType`] instead of being carried through.

use crate::error::{GeoError, Result};
use crate::fixed::{from_fixed, to_fixed, Position, SCALE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A closed ring or open path of fixed-point positions.
pub type Ring = Vec<Position>;

/// Geometry type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GeometryType {
    Point = 0,
    LineString = 1,
    Polygon = 2,
    MultiPoint = 3,
    MultiLineString = 4,
    MultiPolygon = 5,
}

impl GeometryType {
    /// Parse a GeoJSON `type` tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "Point" => Ok(GeometryType::Point),
            "LineString" => Ok(GeometryType::LineString),
            "Polygon" => Ok(GeometryType::Polygon),
            "MultiPoint" => Ok(GeometryType::MultiPoint),
            "MultiLineString" => Ok(GeometryType::MultiLineString),
            "MultiPolygon" => Ok(GeometryType::MultiPolygon),
            other => Err(GeoError::UnsupportedGeometryType(other.to_string())),
        }
    }

    /// The GeoJSON `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }

    /// Check if this type encloses an area.
    pub fn is_areal(&self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::MultiPolygon)
    }
}

/// Axis-aligned bounding box in fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub min_lat: i64,
    pub min_lon: i64,
    pub max_lat: i64,
    pub max_lon: i64,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(min_lat: i64, min_lon: i64, max_lat: i64, max_lon: i64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Reject inverted or out-of-range boxes. Boxes crossing the antimeridian
    /// are not supported.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: i64, limit: i64| (-limit..=limit).contains(&v);
        if !in_range(self.min_lat, 90 * SCALE) || !in_range(self.max_lat, 90 * SCALE) {
            return Err(GeoError::InvalidBoundingBox(format!(
                "latitude outside [-90, 90]: {}..{}",
                self.min_lat, self.max_lat
            )));
        }
        if !in_range(self.min_lon, 180 * SCALE) || !in_range(self.max_lon, 180 * SCALE) {
            return Err(GeoError::InvalidBoundingBox(format!(
                "longitude outside [-180, 180]: {}..{}",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat > self.max_lat {
            return Err(GeoError::InvalidBoundingBox(format!(
                "min_lat {} > max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon > self.max_lon {
            return Err(GeoError::InvalidBoundingBox(format!(
                "min_lon {} > max_lon {}",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    /// Check if this bbox intersects another (edges touching count).
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
            && self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
    }

    /// Check if this bbox contains a point.
    pub fn contains(&self, lat: i64, lon: i64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Check if this bbox fully contains another bbox.
    pub fn contains_bbox(&self, other: &BBox) -> bool {
        self.min_lat <= other.min_lat
            && self.max_lat >= other.max_lat
            && self.min_lon <= other.min_lon
            && self.max_lon >= other.max_lon
    }

    /// Compute from a geometry. `None` if the geometry has no positions.
    pub fn from_geometry(geom: &Geometry) -> Option<Self> {
        let mut positions = geom.positions();
        let first = positions.next()?;
        let init = BBox::new(first[1], first[0], first[1], first[0]);
        Some(positions.fold(init, |b, p| {
            BBox::new(
                b.min_lat.min(p[1]),
                b.min_lon.min(p[0]),
                b.max_lat.max(p[1]),
                b.max_lon.max(p[0]),
            )
        }))
    }
}

/// Fixed-point geometry. Positions are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Geometry type of this value.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    /// Iterate over every stored position, closing vertices included.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => Box::new(ps.iter()),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Box::new(lines.iter().flatten())
            }
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
        }
    }

    /// Convert a floating-point GeoJSON geometry, flooring every coordinate.
    pub fn from_geojson(geom: &GeoJsonGeometry) -> Result<Self> {
        Ok(match geom {
            GeoJsonGeometry::Point(p) => Geometry::Point(fix_position(p)?),
            GeoJsonGeometry::MultiPoint(ps) => Geometry::MultiPoint(fix_path(ps)?),
            GeoJsonGeometry::LineString(ps) => Geometry::LineString(fix_path(ps)?),
            GeoJsonGeometry::MultiLineString(ls) => Geometry::MultiLineString(fix_paths(ls)?),
            GeoJsonGeometry::Polygon(rings) => Geometry::Polygon(fix_paths(rings)?),
            GeoJsonGeometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys.iter().map(|p| fix_paths(p)).collect::<Result<_>>()?,
            ),
        })
    }

    /// Parse a GeoJSON geometry object.
    pub fn from_geojson_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_geojson(&GeoJsonGeometry::from_value(&value)?)
    }

    /// Parse a WKT string.
    ///
    /// Rings are taken from the WKT text as written, so an unclosed ring
    /// stays unclosed and is rejected later by ring validation.
    pub fn from_wkt(s: &str) -> Result<Self> {
        Self::from_wkt_ast(&parse_wkt(s)?)
    }

    fn from_wkt_ast(w: &wkt::Wkt<f64>) -> Result<Self> {
        use wkt::types as wt;

        fn pos(c: &wt::Coord<f64>) -> Position {
            [to_fixed(c.x), to_fixed(c.y)]
        }
        fn point(p: &wt::Point<f64>) -> Result<Position> {
            p.0.as_ref()
                .map(pos)
                .ok_or_else(|| GeoError::invalid_geometry("empty point"))
        }
        fn line(ls: &wt::LineString<f64>) -> Vec<Position> {
            ls.0.iter().map(pos).collect()
        }
        fn polygon(p: &wt::Polygon<f64>) -> Vec<Ring> {
            p.0.iter().map(line).collect()
        }

        Ok(match w {
            wkt::Wkt::Point(p) => Geometry::Point(point(p)?),
            wkt::Wkt::MultiPoint(mp) => {
                Geometry::MultiPoint(mp.0.iter().map(point).collect::<Result<_>>()?)
            }
            wkt::Wkt::LineString(ls) => Geometry::LineString(line(ls)),
            wkt::Wkt::MultiLineString(mls) => {
                Geometry::MultiLineString(mls.0.iter().map(line).collect())
            }
            wkt::Wkt::Polygon(p) => Geometry::Polygon(polygon(p)),
            wkt::Wkt::MultiPolygon(mp) => Geometry::MultiPolygon(mp.0.iter().map(polygon).collect()),
            wkt::Wkt::GeometryCollection(_) => {
                return Err(GeoError::UnsupportedGeometryType(
                    "GeometryCollection".into(),
                ))
            }
        })
    }

    /// Convert to a floating-point `geo-types` geometry.
    pub fn to_geo_types(&self) -> geo_types::Geometry<f64> {
        use geo_types as gt;

        fn coord(p: &Position) -> gt::Coord<f64> {
            gt::Coord {
                x: from_fixed(p[0]),
                y: from_fixed(p[1]),
            }
        }
        fn line(ps: &[Position]) -> gt::LineString<f64> {
            gt::LineString::new(ps.iter().map(coord).collect())
        }
        fn polygon(rings: &[Ring]) -> gt::Polygon<f64> {
            let mut rings = rings.iter().map(|r| line(r));
            let exterior = rings.next().unwrap_or_else(|| gt::LineString::new(Vec::new()));
            gt::Polygon::new(exterior, rings.collect())
        }

        match self {
            Geometry::Point(p) => gt::Point::from(coord(p)).into(),
            Geometry::MultiPoint(ps) => {
                gt::MultiPoint::new(ps.iter().map(|p| gt::Point::from(coord(p))).collect()).into()
            }
            Geometry::LineString(ps) => line(ps).into(),
            Geometry::MultiLineString(ls) => {
                gt::MultiLineString::new(ls.iter().map(|l| line(l)).collect()).into()
            }
            Geometry::Polygon(rings) => polygon(rings).into(),
            Geometry::MultiPolygon(polys) => {
                gt::MultiPolygon::new(polys.iter().map(|p| polygon(p)).collect()).into()
            }
        }
    }
}

impl TryFrom<&geo_types::Geometry<f64>> for Geometry {
    type Error = GeoError;

    fn try_from(geom: &geo_types::Geometry<f64>) -> Result<Self> {
        use geo_types as gt;

        fn pos(c: &gt::Coord<f64>) -> Position {
            [to_fixed(c.x), to_fixed(c.y)]
        }
        fn line(ls: &gt::LineString<f64>) -> Vec<Position> {
            ls.coords().map(pos).collect()
        }
        fn polygon(p: &gt::Polygon<f64>) -> Vec<Ring> {
            std::iter::once(p.exterior())
                .chain(p.interiors())
                .map(line)
                .collect()
        }

        Ok(match geom {
            gt::Geometry::Point(p) => Geometry::Point(pos(&p.0)),
            gt::Geometry::MultiPoint(mp) => Geometry::MultiPoint(mp.iter().map(|p| pos(&p.0)).collect()),
            gt::Geometry::LineString(ls) => Geometry::LineString(line(ls)),
            gt::Geometry::MultiLineString(mls) => {
                Geometry::MultiLineString(mls.iter().map(line).collect())
            }
            gt::Geometry::Polygon(p) => Geometry::Polygon(polygon(p)),
            gt::Geometry::MultiPolygon(mp) => {
                Geometry::MultiPolygon(mp.iter().map(polygon).collect())
            }
            gt::Geometry::GeometryCollection(_) => {
                return Err(GeoError::UnsupportedGeometryType(
                    "GeometryCollection".into(),
                ))
            }
            gt::Geometry::Line(_) => {
                return Err(GeoError::UnsupportedGeometryType("Line".into()))
            }
            gt::Geometry::Rect(_) => {
                return Err(GeoError::UnsupportedGeometryType("Rect".into()))
            }
            gt::Geometry::Triangle(_) => {
                return Err(GeoError::UnsupportedGeometryType("Triangle".into()))
            }
        })
    }
}

/// Floating-point GeoJSON geometry (`[lon, lat]` degrees, extra ordinates ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeoJsonGeometry {
    Point(Vec<f64>),
    MultiPoint(Vec<Vec<f64>>),
    LineString(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

impl GeoJsonGeometry {
    /// Decode a geometry object, rejecting unsupported `type` tags up front.
    pub fn from_value(value: &Value) -> Result<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| GeoError::invalid_geometry("geometry has no \"type\""))?;
        GeometryType::from_tag(tag)?;
        Ok(Self::deserialize(value)?)
    }
}

/// A GeoJSON feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub properties: Value,
    pub geometry: GeoJsonGeometry,
}

impl Feature {
    /// Decode a `Feature` object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let geometry = value
            .get("geometry")
            .filter(|g| !g.is_null())
            .ok_or_else(|| GeoError::invalid_geometry("feature has no geometry"))?;
        Ok(Self {
            id: value.get("id").cloned(),
            properties: value.get("properties").cloned().unwrap_or(Value::Null),
            geometry: GeoJsonGeometry::from_value(geometry)?,
        })
    }

    /// Fixed-point geometry of this feature.
    pub fn to_geometry(&self) -> Result<Geometry> {
        Geometry::from_geojson(&self.geometry)
    }
}

/// Any top-level GeoJSON document this crate accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Geometry(GeoJsonGeometry),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl GeoJson {
    /// Parse a GeoJSON document.
    pub fn parse(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(&value)
    }

    /// Decode a GeoJSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                let features = value
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        GeoError::invalid_geometry("FeatureCollection has no \"features\" array")
                    })?;
                Ok(GeoJson::FeatureCollection(
                    features
                        .iter()
                        .map(Feature::from_value)
                        .collect::<Result<_>>()?,
                ))
            }
            Some("Feature") => Ok(GeoJson::Feature(Feature::from_value(value)?)),
            Some(_) => Ok(GeoJson::Geometry(GeoJsonGeometry::from_value(value)?)),
            None => Err(GeoError::invalid_geometry("GeoJSON object has no \"type\"")),
        }
    }

    /// Every geometry in document order, converted to fixed point.
    pub fn geometries(&self) -> Result<Vec<Geometry>> {
        match self {
            GeoJson::Geometry(g) => Ok(vec![Geometry::from_geojson(g)?]),
            GeoJson::Feature(f) => Ok(vec![f.to_geometry()?]),
            GeoJson::FeatureCollection(fs) => fs.iter().map(Feature::to_geometry).collect(),
        }
    }
}

/// Vertex centroid as fixed-point `(lat, lon)`.
///
/// Averages every vertex, skipping the closing vertex of closed rings, with
/// truncating integer division.
pub fn centroid(geom: &Geometry) -> Result<(i64, i64)> {
    let mut sum_lon: i128 = 0;
    let mut sum_lat: i128 = 0;
    let mut count: i128 = 0;

    let mut add = |p: &Position| {
        sum_lon += p[0] as i128;
        sum_lat += p[1] as i128;
        count += 1;
    };

    match geom {
        Geometry::Point(p) => add(p),
        Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(&mut add),
        Geometry::MultiLineString(lines) => lines.iter().flatten().for_each(&mut add),
        Geometry::Polygon(rings) => rings.iter().for_each(|r| open_ring(r).iter().for_each(&mut add)),
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .flatten()
            .for_each(|r| open_ring(r).iter().for_each(&mut add)),
    }

    if count == 0 {
        return Err(GeoError::invalid_geometry("cannot take centroid of empty geometry"));
    }
    Ok(((sum_lat / count) as i64, (sum_lon / count) as i64))
}

/// Ring without its closing vertex.
fn open_ring(ring: &[Position]) -> &[Position] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn fix_position(p: &[f64]) -> Result<Position> {
    match p {
        [lon, lat, ..] => Ok([to_fixed(*lon), to_fixed(*lat)]),
        _ => Err(GeoError::invalid_geometry(format!(
            "position needs at least 2 ordinates, got {}",
            p.len()
        ))),
    }
}

fn fix_path(ps: &[Vec<f64>]) -> Result<Vec<Position>> {
    ps.iter().map(|p| fix_position(p)).collect()
}

fn fix_paths(paths: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Position>>> {
    paths.iter().map(|p| fix_path(p)).collect()
}

/// Parse a WKT string into its syntax tree.
pub fn parse_wkt(wkt: &str) -> Result<wkt::Wkt<f64>> {
    use std::str::FromStr;
    wkt::Wkt::from_str(wkt).map_err(|e| GeoError::WktParse(e.to_string()))
}
