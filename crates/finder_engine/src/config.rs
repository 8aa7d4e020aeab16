use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use finder_logging::{finder_info, finder_warn};
use thiserror::Error;

pub const SOURCES_TABLE: &str = "point_sites";
pub const OFFERS_TABLE: &str = "offers";
pub const SELECTION_SLOT: &str = "siteIds";
const STATE_DIR_NAME: &str = "offer_finder";

const URL_KEYS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_KEYS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Connection details for the hosted offer backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub settings: StoreSettings,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            settings: StoreSettings::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = first_present(&lookup, &URL_KEYS).ok_or(ConfigError::Missing(URL_KEYS[0]))?;
        let api_key = first_present(&lookup, &KEY_KEYS).ok_or(ConfigError::Missing(KEY_KEYS[0]))?;

        let defaults = StoreSettings::default();
        let settings = StoreSettings {
            connect_timeout: millis(
                &lookup,
                "OFFER_FINDER_CONNECT_TIMEOUT_MS",
                defaults.connect_timeout,
            )?,
            request_timeout: millis(
                &lookup,
                "OFFER_FINDER_REQUEST_TIMEOUT_MS",
                defaults.request_timeout,
            )?,
            max_bytes: try_load(&lookup, "OFFER_FINDER_MAX_BYTES", defaults.max_bytes)?,
        };

        Ok(Self {
            base_url,
            api_key,
            settings,
        })
    }
}

/// Directory holding the persisted selection slots.
///
/// `OFFER_FINDER_STATE_DIR` wins; otherwise the platform config directory is used.
pub fn state_dir_from_env() -> PathBuf {
    state_dir_from_lookup(|key| env::var(key).ok())
}

pub fn state_dir_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = non_empty(lookup("OFFER_FINDER_STATE_DIR")) {
        return PathBuf::from(dir);
    }
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join(STATE_DIR_NAME),
        None => {
            finder_warn!("No user config directory, keeping state in the current directory");
            PathBuf::from(".")
        }
    }
}

fn first_present(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty(lookup(key)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match non_empty(lookup(key)) {
        None => {
            finder_info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.parse().map_err(|e: T::Err| {
            finder_warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                message: e.to_string(),
            }
        }),
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    try_load(lookup, key, default_ms).map(Duration::from_millis)
}
