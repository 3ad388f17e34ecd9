//! Service configuration: TOML sections with built-in defaults.
//!
//! Every field carries a `#[serde(default)]`, so an empty file (or no file)
//! reproduces the stock behaviour exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::model::ModelSource;

/// Env var naming a config file.
pub const CONFIG_ENV_VAR: &str = "FOREST_CONFIG";
/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "forest_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$FOREST_CONFIG` env var
/// 2. `./forest_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Input tables
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub model: ModelConfig,

    /// Series derivation tuning
    #[serde(default)]
    pub series: SeriesConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order.
    ///
    /// A missing file falls through to the next source. A file that exists
    /// but cannot be read, parsed or validated is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                let config = Self::load_from_file(&p)?;
                info!(path = %p.display(), "Loaded config from {CONFIG_ENV_VAR}");
                return Ok(config);
            }
            warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!("Loaded config from ./{LOCAL_CONFIG_FILE}");
            return Ok(config);
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings; out-of-range values are errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Range checks. Suspicious-but-legal values are logged, not rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) if path.as_os_str().is_empty() => {
                write!(f, "Config parse error: {}", e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address.
    ///
    /// Can be overridden by the `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Allowed CORS origins. Empty means same-origin only, unless
    /// `FOREST_CORS_ORIGINS` is set.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cors_origins: Vec::new(),
        }
    }
}

// ============================================================================
// Data
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// 2000/2010 measurement table (CSV, hectares)
    #[serde(default = "default_measurements_path")]
    pub measurements_path: PathBuf,

    /// Per-year 2011-2075 forecast table (CSV)
    #[serde(default = "default_long_range_path")]
    pub long_range_path: PathBuf,

    /// Abort startup on any rejected row instead of skipping it.
    #[serde(default)]
    pub strict: bool,
}

fn default_measurements_path() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_MEASUREMENTS_PATH)
}
fn default_long_range_path() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_LONG_RANGE_PATH)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            measurements_path: default_measurements_path(),
            long_range_path: default_long_range_path(),
            strict: false,
        }
    }
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which forecaster fills 2026-2075: auto | table | regression | none
    #[serde(default)]
    pub source: ModelSource,
}

// ============================================================================
// Series
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Decay base for the 2011-2025 extrapolation, in (0, 1].
    #[serde(default = "default_moderating_factor")]
    pub moderating_factor: f64,
}

fn default_moderating_factor() -> f64 {
    defaults::MODERATING_FACTOR
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            moderating_factor: default_moderating_factor(),
        }
    }
}
