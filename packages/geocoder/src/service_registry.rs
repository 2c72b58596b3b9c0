//! Geocoding service configuration.
//!
//! The default Nominatim configuration is embedded at compile time from
//! `services/nominatim.toml`. A replacement file with the same shape can
//! be loaded at runtime with [`load_from_file`] (e.g. to point at a
//! self-hosted instance or relax the rate limit).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::GeocodeError;
use crate::retry::{RetryConfig, RetryPolicy};

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint URL.
    pub base_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum delay between requests in milliseconds.
    #[serde(default)]
    pub rate_limit_ms: u64,
    /// Optional comma-separated ISO country codes to restrict results.
    #[serde(default)]
    pub country_codes: Option<String>,
    /// Retry settings.
    #[serde(default = "default_retry")]
    pub retry: RetryConfig,
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        base_delay_ms: 1000,
        max_delay_ms: 8000,
    }
}

impl GeocodingService {
    /// Retry policy derived from the `[retry]` table.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.into()
    }

    /// Minimum interval between provider requests.
    #[must_use]
    pub const fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Parses a service configuration from a TOML string.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if the TOML is malformed.
pub fn parse(toml_str: &str) -> Result<GeocodingService, GeocodeError> {
    toml::de::from_str(toml_str).map_err(|e| GeocodeError::Config {
        message: e.to_string(),
    })
}

/// Returns the embedded Nominatim configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (covered by tests since the
/// file is compiled in).
#[must_use]
pub fn nominatim() -> GeocodingService {
    parse(NOMINATIM_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded geocoding service 'nominatim': {e}"))
}

/// Loads a service configuration from a TOML file on disk.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if the file cannot be read or parsed.
pub fn load_from_file(path: &Path) -> Result<GeocodingService, GeocodeError> {
    let contents = std::fs::read_to_string(path).map_err(|e| GeocodeError::Config {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    parse(&contents)
}
