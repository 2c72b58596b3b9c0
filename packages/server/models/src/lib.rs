#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the IPC crime dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics types to allow independent evolution of the API
//! contract.

use ipc_dashboard_analytics_models::{Selection, YearRange};
use serde::{Deserialize, Serialize};

/// Query parameters shared by the dashboard page and the summary API.
///
/// Multi-select inputs arrive as repeated keys (`state=A&state=B`). The
/// plural keys take a comma-separated list instead (`states=A,B`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// First year of the range.
    pub start_year: Option<i32>,
    /// Last year of the range.
    pub end_year: Option<i32>,
    /// Selected state / union territory names.
    pub states: Vec<String>,
    /// Selected district names.
    pub districts: Vec<String>,
}

impl DashboardQuery {
    /// Builds a query from decoded `key=value` pairs.
    ///
    /// Unknown keys and unparseable years are ignored.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "start_year" | "startYear" => query.start_year = value.parse().ok(),
                "end_year" | "endYear" => query.end_year = value.parse().ok(),
                "state" => push_name(&mut query.states, value),
                "states" => push_names(&mut query.states, value),
                "district" => push_name(&mut query.districts, value),
                "districts" => push_names(&mut query.districts, value),
                _ => {}
            }
        }

        query
    }

    /// Resolves the query against the dataset's full year range.
    ///
    /// Missing bounds fall back to `full`. Reversed bounds are kept as
    /// given, so the range contains no years.
    #[must_use]
    pub fn selection(&self, full: YearRange) -> Selection {
        let years = YearRange::new(
            self.start_year.unwrap_or(full.start),
            self.end_year.unwrap_or(full.end),
        );

        Selection::new(years)
            .with_states(self.states.iter().cloned())
            .with_districts(self.districts.iter().cloned())
    }
}

fn push_name(target: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        target.push(value.to_string());
    }
}

fn push_names(target: &mut Vec<String>, value: &str) {
    for name in value.split(',') {
        push_name(target, name.trim());
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Whether crime data was loaded at startup.
    pub data_available: bool,
    /// Number of loaded records.
    pub records: usize,
}

/// Error body returned by the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable reason.
    pub error: String,
}

/// An emergency service and its phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    /// Service name.
    pub service: &'static str,
    /// Number to dial.
    pub number: &'static str,
}

/// Contacts listed in the dashboard sidebar.
pub const EMERGENCY_CONTACTS: [EmergencyContact; 3] = [
    EmergencyContact {
        service: "Police",
        number: "100",
    },
    EmergencyContact {
        service: "Ambulance",
        number: "108",
    },
    EmergencyContact {
        service: "Fire",
        number: "101",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_and_comma_separated_names() {
        let query = DashboardQuery::from_pairs([
            ("start_year", "2010"),
            ("end_year", "2014"),
            ("state", "KERALA"),
            ("state", "GOA"),
            ("districts", "KOLLAM, NORTH GOA"),
            ("ignored", "x"),
        ]);

        assert_eq!(query.start_year, Some(2010));
        assert_eq!(query.end_year, Some(2014));
        assert_eq!(query.states, vec!["KERALA", "GOA"]);
        assert_eq!(query.districts, vec!["KOLLAM", "NORTH GOA"]);
    }

    #[test]
    fn blank_and_invalid_values_are_ignored() {
        let query = DashboardQuery::from_pairs([
            ("start_year", "soon"),
            ("end_year", ""),
            ("state", ""),
        ]);
        assert_eq!(query, DashboardQuery::default());
    }

    #[test]
    fn selection_defaults_to_full_range() {
        let selection = DashboardQuery::default().selection(YearRange::new(2001, 2012));
        assert_eq!(selection.years, YearRange::new(2001, 2012));
        assert!(selection.states.is_empty());
        assert!(selection.districts.is_empty());
    }

    #[test]
    fn singular_keys_keep_commas_in_names() {
        let query = DashboardQuery::from_pairs([
            ("state", "DADRA, NAGAR HAVELI"),
            ("district", "A, B"),
            ("states", "GOA,"),
        ]);

        assert_eq!(query.states, vec!["DADRA, NAGAR HAVELI", "GOA"]);
        assert_eq!(query.districts, vec!["A, B"]);
    }

    #[test]
    fn reversed_bounds_select_no_years() {
        let query = DashboardQuery {
            start_year: Some(2015),
            end_year: Some(2010),
            ..DashboardQuery::default()
        };
        let years = query.selection(YearRange::new(2000, 2020)).years;

        assert_eq!(years, YearRange::new(2015, 2010));
        assert!((2000..=2020).all(|year| !years.contains(year)));
    }

    #[test]
    fn health_serializes_camel_case() {
        let json = serde_json::to_value(ApiHealth {
            healthy: true,
            version: "0.1.0".to_string(),
            data_available: false,
            records: 0,
        })
        .unwrap();
        assert_eq!(json["dataAvailable"], false);
    }
}
