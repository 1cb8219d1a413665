use crate::error::{CliError, CliResult};
use ecoasset_geo::IndexConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "ecoasset.toml";

/// Contents of `ecoasset.toml`.
///
/// ```toml
/// [index]
/// precision = 8
///
/// [index.covering]
/// max_cells = 4096
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub index: IndexConfig,
}

/// Parse and validate a config document.
pub fn parse_config(text: &str) -> CliResult<CliConfig> {
    let config: CliConfig =
        toml::from_str(text).map_err(|e| CliError::Config(format!("invalid config: {e}")))?;
    config
        .index
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(config)
}

/// Load the config from an explicit path, or from `ecoasset.toml` in the
/// working directory, or fall back to defaults.
pub fn load_config(config_override: Option<&Path>) -> CliResult<CliConfig> {
    let path = match config_override {
        Some(p) => {
            if !p.is_file() {
                return Err(CliError::Config(format!(
                    "config path does not exist: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(CliConfig::default()),
        },
    };

    let text = fs::read_to_string(&path)
        .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
    let config = parse_config(&text)?;
    tracing::info!(path = %path.display(), precision = config.index.precision, "loaded config");
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let candidate = std::env::current_dir().ok()?.join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
