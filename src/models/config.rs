use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::params::{Bitplanes, DitherMode, EdgePolicy, PipelineParams, DEFAULT_LAYER_PREFIX};
use crate::error::ConfigError;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "OCS_PALETTE_CONFIG";

/// Default file name written by `ocs-palette init`.
pub const DEFAULT_CONFIG_FILE: &str = "ocs-palette.yaml";

/// Application configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dithering for the first palette reduction
    #[serde(default)]
    pub dither: DitherMode,

    /// Bitplanes (1-5), color budget is 2^bitplanes
    #[serde(default)]
    pub bitplanes: Bitplanes,

    /// Prefix for the name of the requantized layer
    #[serde(default = "default_layer_prefix")]
    pub layer_prefix: String,

    /// Whether the rightmost column is requantized
    #[serde(default)]
    pub edge_policy: EdgePolicy,

    /// Re-compress written PNGs with oxipng
    #[serde(default = "default_optimize_png")]
    pub optimize_png: bool,
}

fn default_layer_prefix() -> String {
    DEFAULT_LAYER_PREFIX.to_string()
}

fn default_optimize_png() -> bool {
    true
}

impl AppConfig {
    /// Config path from the command line, falling back to the environment.
    pub fn resolve_path(cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }

    /// Load configuration from `path`.
    ///
    /// No path or a missing file yields the defaults. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            dither = %config.dither,
            bitplanes = %config.bitplanes,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Pipeline parameters described by this configuration.
    pub fn params(&self) -> PipelineParams {
        PipelineParams::new(self.dither, self.bitplanes)
            .with_edge_policy(self.edge_policy)
            .with_layer_prefix(self.layer_prefix.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dither: DitherMode::default(),
            bitplanes: Bitplanes::default(),
            layer_prefix: default_layer_prefix(),
            edge_policy: EdgePolicy::default(),
            optimize_png: default_optimize_png(),
        }
    }
}
