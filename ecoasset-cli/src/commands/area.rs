use crate::cli::{InputFormat, OutputFormat};
use crate::error::CliResult;
use crate::input::{parse_geometries, read_input, resolve_input};
use crate::output::render;
use ecoasset_geo::geometry_area;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct AreaRow {
    pub label: String,
    #[serde(rename = "type")]
    pub geometry_type: &'static str,
    pub area: u64,
}

#[derive(Debug, Serialize)]
pub struct AreaReport {
    pub geometries: Vec<AreaRow>,
    pub total: u64,
}

/// Area of every geometry in `content`. The first invalid geometry aborts.
pub fn compute(content: &str, input: Option<InputFormat>) -> CliResult<AreaReport> {
    let mut geometries = Vec::new();
    let mut total = 0u64;
    for item in parse_geometries(content, input)? {
        let area = geometry_area(&item.geometry)?;
        total = total.saturating_add(area);
        tracing::debug!(label = %item.label, area, "computed area");
        geometries.push(AreaRow {
            label: item.label,
            geometry_type: item.geometry.geometry_type().as_str(),
            area,
        });
    }
    Ok(AreaReport { geometries, total })
}

pub fn render_report(report: &AreaReport, format: OutputFormat) -> CliResult<String> {
    let mut rows: Vec<Vec<String>> = report
        .geometries
        .iter()
        .map(|r| vec![r.label.clone(), r.geometry_type.to_string(), r.area.to_string()])
        .collect();
    if report.geometries.len() > 1 {
        rows.push(vec!["total".into(), String::new(), report.total.to_string()]);
    }
    render(format, &["geometry", "type", "area (m²)"], rows, report)
}

pub fn run(
    file: Option<&Path>,
    expr: Option<&str>,
    input: Option<InputFormat>,
    format: OutputFormat,
) -> CliResult<()> {
    let source = resolve_input(expr, file)?;
    let content = read_input(&source)?;
    let report = compute(&content, input)?;
    println!("{}", render_report(&report, format)?);
    Ok(())
}
