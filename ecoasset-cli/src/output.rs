use crate::cli::OutputFormat;
use crate::error::CliResult;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

/// Render rows as a table, or `json` as pretty JSON, depending on `format`.
pub fn render<T: Serialize>(
    format: OutputFormat,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    json: &T,
) -> CliResult<String> {
    match format {
        OutputFormat::Table => Ok(format_table(headers, rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(json)?),
    }
}

/// Format rows as a table.
pub fn format_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "(no geometries)".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Format a fixed-point coordinate as degrees with nine decimals.
pub fn format_degrees(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let scale = ecoasset_geo::SCALE as u64;
    format!("{sign}{}.{:09}", abs / scale, abs % scale)
}
