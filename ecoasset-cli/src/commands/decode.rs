use crate::error::CliResult;
use crate::output::format_degrees;
use ecoasset_geo::{decode, decode_bbox};

/// Cell center as `"<lat> <lon>"`, plus bounds lines when `with_bbox` is set.
pub fn describe(geohash: &str, with_bbox: bool) -> CliResult<String> {
    let (lat, lon) = decode(geohash)?;
    let mut out = format!("{} {}", format_degrees(lat), format_degrees(lon));
    if with_bbox {
        let bbox = decode_bbox(geohash)?;
        out.push_str(&format!(
            "\nsouth {}\nwest  {}\nnorth {}\neast  {}",
            format_degrees(bbox.min_lat),
            format_degrees(bbox.min_lon),
            format_degrees(bbox.max_lat),
            format_degrees(bbox.max_lon),
        ));
    }
    Ok(out)
}

pub fn run(geohash: &str, with_bbox: bool) -> CliResult<()> {
    println!("{}", describe(geohash, with_bbox)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_describe_center() {
        assert_eq!(
            describe("d6nvms58", false).unwrap(),
            "12.194910048 -69.011135100"
        );
    }

    #[test]
    fn test_describe_bbox() {
        let out = describe("d6nvms58", true).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.lines().nth(1).unwrap().starts_with("south 12.19"));
    }

    #[test]
    fn test_invalid_geohash() {
        assert!(matches!(describe("d6a", false), Err(CliError::Geo(_))));
    }
}
