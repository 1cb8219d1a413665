use crate::error::CliResult;
use ecoasset_geo::{encode, to_fixed};

/// Geohash of a floating-point `(lat, lon)` at `precision`.
pub fn geohash_for(lat: f64, lon: f64, precision: u8) -> CliResult<String> {
    Ok(encode(to_fixed(lat), to_fixed(lon), precision)?.to_string())
}

pub fn run(lat: f64, lon: f64, precision: u8) -> CliResult<()> {
    println!("{}", geohash_for(lat, lon, precision)?);
    Ok(())
}
