#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Selection and aggregate result types for the dashboard.
//!
//! A [`Selection`] describes what the viewer picked (year range, states,
//! districts). The analytics crate turns a selection plus the loaded
//! records into the series defined here, which the chart renderer and
//! the JSON API both consume.

use std::collections::BTreeSet;

use ipc_dashboard_crime_models::{Coordinates, Offense, OffenseCounts};
use serde::{Deserialize, Serialize};

/// An inclusive range of years.
///
/// A range whose start is after its end contains no years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included.
    pub start: i32,
    /// Last year included.
    pub end: i32,
}

impl YearRange {
    /// Creates a range covering `start..=end`.
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `year` lies within the range (both ends inclusive).
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The viewer's current filter choices.
///
/// Empty state or district sets select nothing, not everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Year range to include.
    pub years: YearRange,
    /// Selected state / union territory names.
    pub states: BTreeSet<String>,
    /// Selected district names.
    pub districts: BTreeSet<String>,
}

impl Selection {
    /// Creates a selection over `years` with no states or districts picked.
    #[must_use]
    pub const fn new(years: YearRange) -> Self {
        Self {
            years,
            states: BTreeSet::new(),
            districts: BTreeSet::new(),
        }
    }

    /// Adds states to the selection.
    #[must_use]
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds districts to the selection.
    #[must_use]
    pub fn with_districts<I, S>(mut self, districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.districts.extend(districts.into_iter().map(Into::into));
        self
    }
}

/// Total IPC crimes for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTotal {
    /// Calendar year.
    pub year: i32,
    /// Sum of total IPC crimes.
    pub total: u64,
}

/// Offense and total counts summed for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenseTrendPoint {
    /// Calendar year.
    pub year: i32,
    /// Sum of total IPC crimes.
    pub total_ipc_crimes: u64,
    /// Per-offense sums.
    pub offenses: OffenseCounts,
}

/// Running total of IPC crimes up to and including `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeTotal {
    /// Calendar year.
    pub year: i32,
    /// Sum of yearly totals up to this year.
    pub cumulative: u64,
}

/// One slice of an offense distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenseShare {
    /// The offense.
    pub offense: Offense,
    /// Summed count.
    pub count: u64,
    /// Share of the distribution total, 0-100.
    pub percentage: f64,
}

/// A node in the state → district → total hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    /// Node label.
    pub name: String,
    /// Sum of total IPC crimes beneath this node.
    pub value: u64,
    /// Child nodes, sorted by name.
    pub children: Vec<Self>,
}

/// A located record for the map and scatter charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// State / union territory.
    pub state: String,
    /// District (hover label).
    pub district: String,
    /// Calendar year.
    pub year: i32,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Total IPC crimes (bubble size and colour).
    pub total: u64,
}

/// Weighted protection score for a district row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionLevel {
    /// District name.
    pub district: String,
    /// State / union territory.
    pub state: String,
    /// Calendar year.
    pub year: i32,
    /// Total IPC crimes.
    pub total: u64,
    /// Protection score in `0.0..=1.0` (higher is more protection needed).
    pub level: f64,
    /// Where to place the row on the protection map, if geocoded.
    pub coordinates: Option<Coordinates>,
}

/// Options offered by the dashboard selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorOptions {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct states, sorted.
    pub states: Vec<String>,
    /// Distinct districts (narrowed to the selected states if any), sorted.
    pub districts: Vec<String>,
}

/// Every series the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The selection these series were computed for.
    pub selection: Selection,
    /// Records matching the full selection.
    pub selected_records: usize,
    /// Records matching the year range only.
    pub year_range_records: usize,
    /// Total IPC crimes per year for the full selection.
    pub yearly_totals: Vec<YearlyTotal>,
    /// Located records for the full selection.
    pub map_points: Vec<MapPoint>,
    /// Per-offense sums per year over the year range.
    pub offense_trends: Vec<OffenseTrendPoint>,
    /// Running totals over the year range.
    pub cumulative_totals: Vec<CumulativeTotal>,
    /// Latest year present in the year range, if any.
    pub latest_year: Option<i32>,
    /// Offense distribution for the latest year.
    pub latest_distribution: Vec<OffenseShare>,
    /// State → district → total tree for the latest year.
    pub hierarchy: HierarchyNode,
    /// Located records over the year range.
    pub scatter_points: Vec<MapPoint>,
    /// Protection scores for the full selection.
    pub protection_levels: Vec<ProtectionLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_is_inclusive() {
        let range = YearRange::new(2010, 2015);
        assert!(range.contains(2010));
        assert!(range.contains(2015));
        assert!(!range.contains(2009));
        assert!(!range.contains(2016));
    }

    #[test]
    fn reversed_range_is_empty() {
        let range = YearRange::new(2015, 2010);
        assert!(!range.contains(2012));
        assert!(!range.contains(2010));
    }

    #[test]
    fn selection_builders_collect_names() {
        let selection = Selection::new(YearRange::new(2001, 2002))
            .with_states(["KERALA", "GOA"])
            .with_districts(vec!["KOLLAM".to_string()]);
        assert_eq!(selection.states.len(), 2);
        assert!(selection.districts.contains("KOLLAM"));
    }

    #[test]
    fn offense_share_serializes_column_name() {
        let share = OffenseShare {
            offense: Offense::KidnappingAbduction,
            count: 3,
            percentage: 50.0,
        };
        let json = serde_json::to_value(share).unwrap();
        assert_eq!(json["offense"], "KIDNAPPING & ABDUCTION");
    }
}
