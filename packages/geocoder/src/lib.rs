#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region geocoding for the IPC crime dashboard.
//!
//! Resolves free-text region names (states and union territories) to
//! approximate coordinates so records can be placed on the map charts.
//!
//! - [`nominatim`] talks to the Nominatim / OpenStreetMap search endpoint.
//! - [`retry`] holds the [`retry::RetryPolicy`] and the attempt state
//!   machine that drives retries with exponential backoff.
//! - [`cache`] wraps any [`GeocodeProvider`] in a process-lifetime cache
//!   ([`cache::CachedGeocoder`]).
//! - [`enrich`] attaches coordinates to loaded records, one lookup per
//!   distinct region name.
//! - [`service_registry`] loads the provider configuration from TOML.

pub mod cache;
pub mod enrich;
pub mod nominatim;
pub mod progress;
pub mod retry;
pub mod service_registry;

use async_trait::async_trait;
use ipc_dashboard_crime_models::GeocodedRegion;
use thiserror::Error;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed (e.g. missing coordinate fields).
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The provider returned no match for the query.
    #[error("No match for '{query}'")]
    NoMatch {
        /// The region name that was looked up.
        query: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Unexpected HTTP status.
    #[error("HTTP status {status}")]
    Status {
        /// Status code returned by the provider.
        status: u16,
    },

    /// Provider configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl GeocodeError {
    /// Returns `true` if another attempt might succeed.
    ///
    /// Request-level failures, malformed or empty responses, rate limiting
    /// and 5xx statuses are transient. Other 4xx statuses and configuration
    /// errors are permanent.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse { .. } | Self::NoMatch { .. } | Self::RateLimited => true,
            Self::Status { status } => *status >= 500,
            Self::Config { .. } => false,
        }
    }
}

/// A single-shot geocoding backend.
///
/// Implementations perform exactly one lookup per call; retrying and
/// caching are layered on top by [`cache::CachedGeocoder`].
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &str;

    /// Looks up `query` and returns the best match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails or yields no usable
    /// coordinates.
    async fn lookup(&self, query: &str) -> Result<GeocodedRegion, GeocodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(
            GeocodeError::Parse {
                message: "missing lat".to_string()
            }
            .is_retryable()
        );
        assert!(
            GeocodeError::NoMatch {
                query: "KERALA".to_string()
            }
            .is_retryable()
        );
        assert!(GeocodeError::RateLimited.is_retryable());
        assert!(GeocodeError::Status { status: 503 }.is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!GeocodeError::Status { status: 403 }.is_retryable());
        assert!(
            !GeocodeError::Config {
                message: "bad".to_string()
            }
            .is_retryable()
        );
    }
}
