//! Application configuration loading from config.toml
//!
//! Every setting has a default, so the file is optional. A present but malformed file
//! is an error rather than being silently ignored.

use crate::aggregator::wishlist::SortOption;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "WISHLIST_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection string; `DATABASE_URL` overrides it
    pub database_url: Option<String>,
    /// Wishlist screen settings
    pub wishlist: WishlistConfig,
    /// Formatting settings
    pub display: DisplayConfig,
}

/// `[wishlist]` table
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WishlistConfig {
    /// Sort applied when the wishlist is first shown
    pub default_sort: SortOption,
}

/// `[display]` table
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix put in front of amounts (e.g., `"Rp"`)
    pub currency_prefix: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_prefix: "Rp".to_string(),
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// `Io` if the file cannot be read, `Config` if the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref)
        .inspect_err(|e| warn!("Failed to read config file {:?}: {}", path_ref, e))?;
    parse_config(&contents)
}

/// Loads configuration from `$WISHLIST_CONFIG` or `./config.toml`, using defaults when the
/// file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        info!("No config file at {}, using defaults", path);
        return Ok(AppConfig::default());
    }
    let config = load_config(&path)?;
    info!("Loaded configuration from {}", path);
    Ok(config)
}
