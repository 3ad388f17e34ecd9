//! Service Configuration Module
//!
//! ## Loading Order
//!
//! 1. `FOREST_CONFIG` environment variable (path to TOML file)
//! 2. `forest_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(AppConfig::load()?);
//! let factor = config::get().series.moderating_factor;
//! ```

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;

use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init(config: AppConfig) {
    if APP_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// The global configuration.
///
/// Falls back to built-in defaults (and pins them) if `init()` was never
/// called, so library users and tests need no setup.
pub fn get() -> &'static AppConfig {
    APP_CONFIG.get_or_init(|| {
        tracing::debug!("config::get() before init(), using defaults");
        AppConfig::default()
    })
}
