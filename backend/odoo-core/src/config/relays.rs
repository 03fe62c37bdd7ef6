use crate::codec::DecodeMode;
use crate::error::ConfigError;
use crate::relay::forwarding::TARGET_PLACEHOLDER;
use crate::relay::{DirectStrategy, ForwardingRelay, HostedRelay, RelayKind, RelayTable};

use common::ErrorLocation;

use std::collections::HashSet;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_DIR_NAME: &str = "sanjose-portal";
const RELAYS_FILE_NAME: &str = "relays.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STRATEGY_NAME: &str = "direct";

// ============================================
// RELAY TABLE FILE
// ============================================

/// One `[[relay]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelaySpec {
    pub name: String,
    pub kind: RelayKind,
    /// Forwarder template containing `{url}`, or the hosted relay endpoint.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RelaySpec {
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelayKind::Direct,
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enabled: true,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayConfig {
    #[serde(default, rename = "relay")]
    pub relays: Vec<RelaySpec>,

    /// Start with relays ahead of direct delivery.
    #[serde(default)]
    pub prefer_relay: bool,

    /// Reject unknown value tags instead of reading them as text.
    #[serde(default = "default_strict_decoding")]
    pub strict_decoding: bool,

    /// Consecutive failures before a strategy is taken out of rotation; 0 never.
    #[serde(default)]
    pub failure_threshold: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            relays: vec![RelaySpec::direct(DEFAULT_STRATEGY_NAME)],
            prefer_relay: false,
            strict_decoding: default_strict_decoding(),
            failure_threshold: 0,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_enabled() -> bool {
    true
}
fn default_strict_decoding() -> bool {
    true
}

// ============================================
// IMPLEMENTATION
// ============================================

impl RelayConfig {
    /// `{config_dir}/sanjose-portal/relays.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(RELAYS_FILE_NAME))
    }

    /// Load a relay table file. A missing file yields the direct-only default;
    /// a file that exists but does not parse or validate is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "Relay config not found at {}, using direct delivery only",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::ParseError { location, reason, .. } => ConfigError::ParseError {
                location,
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        info!(
            "Relay config loaded from {} ({} strategies)",
            path.display(),
            config.relays.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = toml::from_str(contents).map_err(|e| {
            warn!("Failed to parse relay config: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: PathBuf::new(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relays.is_empty() {
            return Err(Self::invalid("at least one [[relay]] entry is required"));
        }

        let mut seen = HashSet::new();
        for spec in &self.relays {
            if spec.name.trim().is_empty() {
                return Err(Self::invalid("relay name cannot be empty"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(Self::invalid(format!("duplicate relay name '{}'", spec.name)));
            }
            if spec.timeout_secs == 0 {
                return Err(Self::invalid(format!(
                    "relay '{}' needs a timeout above zero",
                    spec.name
                )));
            }

            match spec.kind {
                RelayKind::Direct => {}
                RelayKind::Forwarding => {
                    let template = spec.url.as_deref().unwrap_or_default();
                    if !template.contains(TARGET_PLACEHOLDER) {
                        return Err(Self::invalid(format!(
                            "forwarding relay '{}' needs a url containing {TARGET_PLACEHOLDER}",
                            spec.name
                        )));
                    }
                }
                RelayKind::Hosted => {
                    let endpoint = spec.url.as_deref().unwrap_or_default();
                    if Url::parse(endpoint).is_err() {
                        return Err(Self::invalid(format!(
                            "hosted relay '{}' needs a valid url",
                            spec.name
                        )));
                    }
                }
            }
        }

        if !self.relays.iter().any(|s| s.enabled) {
            return Err(Self::invalid("every relay is disabled"));
        }

        Ok(())
    }

    pub fn decode_mode(&self) -> DecodeMode {
        if self.strict_decoding {
            DecodeMode::Strict
        } else {
            DecodeMode::Permissive
        }
    }

    /// Instantiate every entry, in file order, sharing one HTTP client.
    pub fn build_table(&self, http: &Client) -> Result<RelayTable, ConfigError> {
        self.validate()?;

        let mut table = RelayTable::new().with_failure_threshold(self.failure_threshold);

        for spec in &self.relays {
            let name = spec.name.clone();
            let url = spec.url.clone().unwrap_or_default();

            table = match spec.kind {
                RelayKind::Direct => {
                    table.with_strategy(DirectStrategy::new(name, http.clone(), spec.timeout()))
                }
                RelayKind::Forwarding => table.with_strategy(ForwardingRelay::new(
                    name,
                    url,
                    http.clone(),
                    spec.timeout(),
                )),
                RelayKind::Hosted => {
                    let endpoint = Url::parse(&url).map_err(|e| {
                        Self::invalid(format!("hosted relay '{}': {e}", spec.name))
                    })?;
                    table.with_strategy(HostedRelay::new(
                        name,
                        endpoint,
                        http.clone(),
                        spec.timeout(),
                    ))
                }
            };

            if !spec.enabled {
                table.set_enabled(&spec.name, false);
            }
        }

        Ok(table)
    }

    #[track_caller]
    fn invalid(reason: impl Into<String>) -> ConfigError {
        ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: reason.into(),
        }
    }
}
