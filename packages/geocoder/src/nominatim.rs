//! Nominatim / OpenStreetMap geocoder client.
//!
//! Region names are sent to the free-form search endpoint. Nominatim has
//! strict rate limits: **1 request per second** maximum on the public
//! instance, and requests must carry an identifying `User-Agent`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use async_trait::async_trait;
use ipc_dashboard_crime_models::GeocodedRegion;

use crate::service_registry::GeocodingService;
use crate::{GeocodeError, GeocodeProvider};

/// Single-shot Nominatim lookups by free-text region name.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
}

impl NominatimProvider {
    /// Builds a provider from a service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_service(service: &GeocodingService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.clone())
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: service.base_url.clone(),
            country_codes: service.country_codes.clone(),
        })
    }

    /// The search endpoint this provider queries.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn lookup(&self, query: &str) -> Result<GeocodedRegion, GeocodeError> {
        let mut params = vec![("q", query), ("format", "jsonv2"), ("limit", "1")];
        if let Some(codes) = self.country_codes.as_deref() {
            params.push(("countrycodes", codes));
        }

        let resp = self.client.get(&self.base_url).query(&params).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)?.ok_or_else(|| GeocodeError::NoMatch {
            query: query.to_string(),
        })
    }
}

/// Parses a Nominatim JSON response.
///
/// Returns `Ok(None)` for an empty result list and an error when the
/// first result lacks usable coordinates.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedRegion>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"]
        .as_str()
        .map(String::from)
        .unwrap_or_default();

    Ok(Some(GeocodedRegion {
        display_name,
        latitude: lat,
        longitude: lon,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "10.3528744",
            "lon": "76.5120396",
            "display_name": "Kerala, India"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 10.352_874_4).abs() < 1e-6);
        assert!((result.longitude - 76.512_039_6).abs() < 1e-6);
        assert_eq!(result.display_name, "Kerala, India");
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn missing_coordinates_is_a_retryable_parse_error() {
        let body = serde_json::json!([{ "display_name": "Somewhere" }]);
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn non_array_body_is_rejected() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn builds_from_embedded_service() {
        let service = crate::service_registry::nominatim();
        let provider = NominatimProvider::from_service(&service).unwrap();
        assert_eq!(provider.base_url(), service.base_url);
        assert_eq!(provider.name(), "nominatim");
    }
}
