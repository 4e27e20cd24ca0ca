use log::debug;
use serde::{Deserialize, Serialize};
use std::env;

use crate::constants::API_URL;

/// Read an environment variable with fallback to a default value
///
/// Tries the unprefixed variable first, then the `UPC_` prefixed variant
/// used by packaged builds.
pub fn read_env(key: &str, default: &str) -> String {
    let value = env::var(key)
        .or_else(|_| env::var(format!("UPC_{}", key)))
        .unwrap_or_else(|_| default.to_string());

    debug!("Environment variable {} resolved to: {}", key, value);
    value
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_url: String,
}

impl RuntimeConfig {
    /// Load configuration from the environment, reading a `.env` file if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            api_url: read_env("API_URL", API_URL).trim_end_matches('/').to_string(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
