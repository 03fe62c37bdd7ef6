pub mod relays;

pub use relays::{RelayConfig, RelaySpec};

use crate::error::ConfigError;

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;
use std::path::PathBuf;

use log::{debug, info, warn};
use url::Url;

pub const ENV_ODOO_URL: &str = "ODOO_URL";
pub const ENV_ODOO_DB: &str = "ODOO_DB";
pub const ENV_ODOO_LOGIN: &str = "ODOO_LOGIN";
pub const ENV_ODOO_API_KEY: &str = "ODOO_API_KEY";

// ============================================
// CONNECTION CONFIG
// ============================================

/// Where the ERP lives and which account the portal uses for lookups.
///
/// Nothing here has a default. The API key is redacted everywhere it could be
/// printed.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    pub database: String,
    pub login: String,
    pub api_key: RedactedSecret,
}

impl ConnectionConfig {
    /// Read the four `ODOO_*` variables, loading a `.env` file first if one
    /// exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match try_load_dotenv() {
            Some(path) => info!("Loaded .env from: {}", path.display()),
            None => debug!("No .env file found - using existing environment variables"),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, ConfigError> {
            match lookup(name).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVariable {
                    location: ErrorLocation::from(Location::caller()),
                    name: name.to_string(),
                }),
            }
        };

        let config = Self {
            url: require(ENV_ODOO_URL)?,
            database: require(ENV_ODOO_DB)?,
            login: require(ENV_ODOO_LOGIN)?,
            api_key: RedactedSecret::new(require(ENV_ODOO_API_KEY)?),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("{ENV_ODOO_URL} is not a valid URL: {e}"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            warn!("Rejecting ERP URL with scheme {}", url.scheme());
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_ODOO_URL} must use http or https"),
            });
        }

        Ok(())
    }
}

fn try_load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        return Some(path);
    }

    let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => Some(env_path),
        Err(e) => {
            warn!("Failed to parse .env at {}: {e}", env_path.display());
            None
        }
    }
}
