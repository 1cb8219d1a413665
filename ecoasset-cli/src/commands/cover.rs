use crate::error::CliResult;
use ecoasset_geo::{covering_for_bbox, to_fixed, BBox, CoveringConfig};

/// Geohash cells covering a degree bounding box, row-major from the south-west.
pub fn cells(
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    precision: u8,
    config: &CoveringConfig,
) -> CliResult<Vec<String>> {
    let bbox = BBox::new(
        to_fixed(min_lat),
        to_fixed(min_lon),
        to_fixed(max_lat),
        to_fixed(max_lon),
    );
    let cells = covering_for_bbox(&bbox, precision, config)?;
    Ok(cells.into_iter().map(String::from).collect())
}

pub fn run(
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    precision: u8,
    config: &CoveringConfig,
) -> CliResult<()> {
    for cell in cells(min_lat, min_lon, max_lat, max_lon, precision, config)? {
        println!("{cell}");
    }
    Ok(())
}
