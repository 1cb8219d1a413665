use crate::cli::{InputFormat, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::input::{parse_geometries, read_input, resolve_input};
use crate::output::render;
use ecoasset_geo::{AssetReceipt, IndexConfig, SpatialDataRegistry};
use std::path::Path;

/// Register every geometry of a GeoJSON or WKT document.
///
/// Features keep their numeric `id`. The others get consecutive ids starting
/// above the largest explicit id (or at 1), in document order.
pub fn build(
    content: &str,
    input: Option<InputFormat>,
    config: IndexConfig,
) -> CliResult<SpatialDataRegistry> {
    let items = parse_geometries(content, input)?;
    let mut next_id = items
        .iter()
        .filter_map(|item| item.id)
        .max()
        .map_or(Some(1), |max| max.checked_add(1));

    let mut registry = SpatialDataRegistry::new(config)?;
    for item in items {
        let id = match item.id {
            Some(id) => id,
            None => {
                let id = next_id.ok_or_else(|| {
                    CliError::Input(format!("no free id left for geometry '{}'", item.label))
                })?;
                next_id = id.checked_add(1);
                id
            }
        };
        registry.register(id, item.geometry).map_err(|e| {
            CliError::Input(format!("geometry '{}' (id {id}): {e}", item.label))
        })?;
    }
    Ok(registry)
}

/// Receipts in registration order.
pub fn receipts(registry: &SpatialDataRegistry) -> Vec<AssetReceipt> {
    registry
        .all_ids()
        .iter()
        .filter_map(|&id| registry.get(id))
        .map(AssetReceipt::from)
        .collect()
}

/// Write the registry's prefix index as JSON.
pub fn write_snapshot(registry: &SpatialDataRegistry, path: &Path) -> CliResult<()> {
    let json = serde_json::to_string_pretty(&registry.index().snapshot())?;
    std::fs::write(path, json)
        .map_err(|e| CliError::Input(format!("failed to write {}: {e}", path.display())))
}

pub fn run(
    file: Option<&Path>,
    expr: Option<&str>,
    input: Option<InputFormat>,
    config: IndexConfig,
    snapshot: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let source = resolve_input(expr, file)?;
    let content = read_input(&source)?;
    let registry = build(&content, input, config)?;

    if let Some(path) = snapshot {
        write_snapshot(&registry, path)?;
        tracing::info!(path = %path.display(), "wrote registry snapshot");
    }

    let receipts = receipts(&registry);
    let rows = receipts
        .iter()
        .map(|r| vec![r.id.to_string(), r.geohash.to_string(), r.area.to_string()])
        .collect();
    println!(
        "{}",
        render(format, &["id", "geohash", "area (m²)"], rows, &receipts)?
    );
    Ok(())
}
