//! Environment-driven settings for a userboard host.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "2";
pub const DEFAULT_STORAGE: &str = "userboard-storage.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheme, host and port of the API.
    pub api_url: String,
    /// User shown in the single-user section.
    pub user_id: i64,
    /// Key-value file holding the access token.
    pub storage_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: try_load(&lookup, "USERBOARD_API_URL", DEFAULT_API_URL)?,
            user_id: try_load(&lookup, "USERBOARD_USER_ID", DEFAULT_USER_ID)?,
            storage_path: try_load(&lookup, "USERBOARD_STORAGE", DEFAULT_STORAGE)?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }
    })
}
