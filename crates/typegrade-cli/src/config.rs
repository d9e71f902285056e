//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use typegrade_core::engine::DEFAULT_MAX_ALIGNMENT_CELLS;

/// Top-level typegrade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypegradeConfig {
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written by `run` when `--format` is omitted.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Upper bound on alignment table cells per attempt.
    #[serde(default = "default_max_cells")]
    pub max_alignment_cells: usize,
    /// Print the word diff after the metrics in text output.
    #[serde(default = "default_show_alignment")]
    pub show_alignment: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./typegrade-results")
}
fn default_format() -> String {
    "json".to_string()
}
fn default_max_cells() -> usize {
    DEFAULT_MAX_ALIGNMENT_CELLS
}
fn default_show_alignment() -> bool {
    true
}

impl Default for TypegradeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            max_alignment_cells: default_max_cells(),
            show_alignment: default_show_alignment(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `typegrade.toml` in the current directory
/// 2. `~/.config/typegrade/config.toml`
///
/// Environment variable overrides: `TYPEGRADE_OUTPUT_DIR`, `TYPEGRADE_MAX_CELLS`.
pub fn load_config_from(path: Option<&Path>) -> Result<TypegradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("typegrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TypegradeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TypegradeConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut TypegradeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(dir) = lookup("TYPEGRADE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(cells) = lookup("TYPEGRADE_MAX_CELLS") {
        config.max_alignment_cells = cells
            .trim()
            .parse()
            .with_context(|| format!("TYPEGRADE_MAX_CELLS is not a cell count: '{cells}'"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("typegrade"))
}
