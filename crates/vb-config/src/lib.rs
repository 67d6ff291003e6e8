//! # vb-config
//!
//! Layered configuration loading for venuebook using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VENUEBOOK_*` prefix, `__` as separator)
//! 2. Project-level `.venuebook/config.toml`
//! 3. User-level `~/.config/venuebook/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VENUEBOOK_DATABASE__PATH` -> `database.path`,
//! `VENUEBOOK_NOTIFY__ENABLED` -> `notify.enabled`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use vb_config::VenueConfig;
//!
//! let config = VenueConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod listing;
mod notify;
mod reports;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use listing::ListingConfig;
pub use notify::NotifyConfig;
pub use reports::ReportConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".venuebook/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VenueConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub reports: ReportConfig,
}

impl VenueConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("VENUEBOOK_").split("__"))
    }

    /// Reject settings that cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.listing.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "listing.max_page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.notify.enabled && self.notify.outbox_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "notify.outbox_path".into(),
                reason: "required when notifications are enabled".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("venuebook").join("config.toml"))
    }
}
