#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter and aggregate stage of the dashboard.
//!
//! Two filtered views feed the charts:
//!
//! - the **selection view** (year range, states and districts) drives the
//!   headline bar chart, the map and the protection table;
//! - the **year-range view** (year range only) drives the overview charts
//!   (offense trends, totals, distributions, scatter and sunburst).
//!
//! [`summarize`] computes every series for one [`Selection`].

pub mod aggregate;
pub mod filter;
pub mod protection;

use ipc_dashboard_analytics_models::{DashboardSummary, Selection};
use ipc_dashboard_crime_models::CrimeRecord;

/// Computes every dashboard series for `selection`.
#[must_use]
pub fn summarize(records: &[CrimeRecord], selection: &Selection) -> DashboardSummary {
    let selected = filter::filter_records(records, selection);
    let in_range = filter::filter_year_range(records, selection.years);

    log::debug!(
        "Selection {} matched {} records ({} in year range)",
        selection.years,
        selected.len(),
        in_range.len(),
    );

    let yearly_in_range = aggregate::yearly_totals(&in_range);
    let latest = aggregate::latest_year_records(&in_range);

    DashboardSummary {
        selection: selection.clone(),
        selected_records: selected.len(),
        year_range_records: in_range.len(),
        yearly_totals: aggregate::yearly_totals(&selected),
        map_points: aggregate::map_points(&selected),
        offense_trends: aggregate::offense_trends(&in_range),
        cumulative_totals: aggregate::cumulative_totals(&yearly_in_range),
        latest_year: aggregate::latest_year(&in_range),
        latest_distribution: aggregate::offense_distribution(&latest),
        hierarchy: aggregate::hierarchy(&latest),
        scatter_points: aggregate::map_points(&in_range),
        protection_levels: protection::protection_levels(&selected),
    }
}

#[cfg(test)]
mod tests {
    use ipc_dashboard_analytics_models::YearRange;
    use ipc_dashboard_crime_models::{Coordinates, OffenseCounts};

    use super::*;

    fn records() -> Vec<CrimeRecord> {
        vec![
            CrimeRecord::new(2011, "KERALA", "KOLLAM", 10, OffenseCounts::new([1; 6]))
                .with_coordinates(Coordinates::new(10.0, 76.0)),
            CrimeRecord::new(2012, "KERALA", "KOLLAM", 20, OffenseCounts::new([2; 6]))
                .with_coordinates(Coordinates::new(10.0, 76.0)),
            CrimeRecord::new(2012, "GOA", "NORTH GOA", 30, OffenseCounts::new([3; 6])),
            CrimeRecord::new(2016, "GOA", "NORTH GOA", 99, OffenseCounts::new([9; 6])),
        ]
    }

    #[test]
    fn selection_and_year_views_feed_different_series() {
        let records = records();
        let selection = Selection::new(YearRange::new(2010, 2015))
            .with_states(["KERALA"])
            .with_districts(["KOLLAM"]);

        let summary = summarize(&records, &selection);

        assert_eq!(summary.selected_records, 2);
        assert_eq!(summary.year_range_records, 3);
        assert_eq!(summary.yearly_totals.len(), 2);
        assert_eq!(summary.map_points.len(), 2);
        assert_eq!(summary.offense_trends.len(), 2);
        assert_eq!(summary.offense_trends[1].total_ipc_crimes, 50);
        assert_eq!(summary.cumulative_totals.last().unwrap().cumulative, 60);
        assert_eq!(summary.latest_year, Some(2012));
        assert_eq!(summary.hierarchy.value, 50);
        assert_eq!(summary.scatter_points.len(), 2);
        assert_eq!(summary.protection_levels.len(), 2);
    }

    #[test]
    fn empty_selection_still_summarizes_year_range() {
        let records = records();
        let summary = summarize(&records, &Selection::new(YearRange::new(2010, 2015)));

        assert_eq!(summary.selected_records, 0);
        assert!(summary.yearly_totals.is_empty());
        assert!(summary.map_points.is_empty());
        assert_eq!(summary.year_range_records, 3);
        assert!(!summary.latest_distribution.is_empty());
    }

    #[test]
    fn empty_dataset_produces_empty_series() {
        let summary = summarize(&[], &Selection::new(YearRange::new(2010, 2015)));
        assert!(summary.offense_trends.is_empty());
        assert!(summary.latest_year.is_none());
        assert!(summary.latest_distribution.is_empty());
        assert!(summary.hierarchy.children.is_empty());
    }
}
