use crate::cli::InputFormat;
use crate::error::{CliError, CliResult};
use ecoasset_geo::{GeoJson, Geometry};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Where the input data comes from.
pub enum InputSource {
    /// From a file on disk.
    File(PathBuf),
    /// From the `-e` inline expression.
    Inline(String),
    /// From stdin (piped).
    Stdin,
}

/// Resolve the input source with priority: `-e` > file > stdin.
pub fn resolve_input(expr: Option<&str>, file: Option<&Path>) -> CliResult<InputSource> {
    if let Some(e) = expr {
        return Ok(InputSource::Inline(e.to_string()));
    }
    if let Some(f) = file {
        return Ok(InputSource::File(f.to_path_buf()));
    }
    if !io::stdin().is_terminal() {
        return Ok(InputSource::Stdin);
    }
    Err(CliError::Input(format!(
        "no input provided\n  {} pass a file, use -e for inline input, or pipe via stdin",
        colored::Colorize::bold(colored::Colorize::cyan("help:"))
    )))
}

/// Read content from the resolved input source.
pub fn read_input(source: &InputSource) -> CliResult<String> {
    match source {
        InputSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display()))),
        InputSource::Inline(s) => Ok(s.clone()),
        InputSource::Stdin => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Guess the input format: JSON documents start with `{`, anything else is WKT.
pub fn detect_format(content: &str) -> InputFormat {
    if content.trim_start().starts_with('{') {
        InputFormat::Geojson
    } else {
        InputFormat::Wkt
    }
}

/// A parsed input geometry with the label and id it came with.
#[derive(Debug, Clone)]
pub struct InputGeometry {
    /// `properties.name` of a feature, or its position in the document.
    pub label: String,
    /// Numeric feature `id`, if present.
    pub id: Option<u64>,
    pub geometry: Geometry,
}

/// Parse every geometry in a GeoJSON or WKT document.
pub fn parse_geometries(content: &str, format: Option<InputFormat>) -> CliResult<Vec<InputGeometry>> {
    match format.unwrap_or_else(|| detect_format(content)) {
        InputFormat::Wkt => Ok(vec![InputGeometry {
            label: "1".to_string(),
            id: None,
            geometry: Geometry::from_wkt(content.trim())?,
        }]),
        InputFormat::Geojson => match GeoJson::parse(content)? {
            GeoJson::Geometry(g) => Ok(vec![InputGeometry {
                label: "1".to_string(),
                id: None,
                geometry: Geometry::from_geojson(&g)?,
            }]),
            GeoJson::Feature(f) => Ok(vec![feature_input(0, &f)?]),
            GeoJson::FeatureCollection(features) => features
                .iter()
                .enumerate()
                .map(|(i, f)| feature_input(i, f))
                .collect(),
        },
    }
}

fn feature_input(index: usize, feature: &ecoasset_geo::Feature) -> CliResult<InputGeometry> {
    let label = feature
        .properties
        .get("name")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| (index + 1).to_string());
    Ok(InputGeometry {
        label,
        id: feature.id.as_ref().and_then(|v| v.as_u64()),
        geometry: feature.to_geometry()?,
    })
}
