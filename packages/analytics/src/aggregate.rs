//! Grouping and summing of filtered records into chart series.
//!
//! Every function takes a filtered view (`&[&CrimeRecord]`) and returns
//! owned series ordered by year (or by name for the hierarchy).

use std::collections::BTreeMap;

use ipc_dashboard_analytics_models::{
    CumulativeTotal, HierarchyNode, MapPoint, OffenseShare, OffenseTrendPoint, YearlyTotal,
};
use ipc_dashboard_crime_models::{CrimeRecord, OffenseCounts};

/// Label of the root node returned by [`hierarchy`].
pub const HIERARCHY_ROOT: &str = "All";

/// Sum of total IPC crimes per year, ascending by year.
#[must_use]
pub fn yearly_totals(records: &[&CrimeRecord]) -> Vec<YearlyTotal> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records {
        *by_year.entry(record.year).or_default() += record.total_ipc_crimes;
    }

    by_year
        .into_iter()
        .map(|(year, total)| YearlyTotal { year, total })
        .collect()
}

/// Per-offense (and total) sums per year, ascending by year.
#[must_use]
pub fn offense_trends(records: &[&CrimeRecord]) -> Vec<OffenseTrendPoint> {
    let mut by_year: BTreeMap<i32, (u64, OffenseCounts)> = BTreeMap::new();
    for record in records {
        let entry = by_year.entry(record.year).or_default();
        entry.0 += record.total_ipc_crimes;
        entry.1.accumulate(&record.offenses);
    }

    by_year
        .into_iter()
        .map(|(year, (total_ipc_crimes, offenses))| OffenseTrendPoint {
            year,
            total_ipc_crimes,
            offenses,
        })
        .collect()
}

/// Running sum of yearly totals.
#[must_use]
pub fn cumulative_totals(yearly: &[YearlyTotal]) -> Vec<CumulativeTotal> {
    yearly
        .iter()
        .scan(0u64, |running, point| {
            *running += point.total;
            Some(CumulativeTotal {
                year: point.year,
                cumulative: *running,
            })
        })
        .collect()
}

/// The latest year present in `records`.
#[must_use]
pub fn latest_year(records: &[&CrimeRecord]) -> Option<i32> {
    records.iter().map(|r| r.year).max()
}

/// Records from the latest year present in `records`.
#[must_use]
pub fn latest_year_records<'a>(records: &[&'a CrimeRecord]) -> Vec<&'a CrimeRecord> {
    latest_year(records).map_or_else(Vec::new, |year| {
        records.iter().copied().filter(|r| r.year == year).collect()
    })
}

/// Per-offense shares of the summed counts in `records`.
///
/// Returns an empty vector when every count is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn offense_distribution(records: &[&CrimeRecord]) -> Vec<OffenseShare> {
    let mut sums = OffenseCounts::default();
    for record in records {
        sums.accumulate(&record.offenses);
    }

    let total = sums.total();
    if total == 0 {
        return Vec::new();
    }

    sums.iter()
        .map(|(offense, count)| OffenseShare {
            offense,
            count,
            percentage: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

/// Builds a root → state → district tree of summed totals.
#[must_use]
pub fn hierarchy(records: &[&CrimeRecord]) -> HierarchyNode {
    let mut states: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
    for record in records {
        *states
            .entry(record.state.as_str())
            .or_default()
            .entry(record.district.as_str())
            .or_default() += record.total_ipc_crimes;
    }

    let children: Vec<HierarchyNode> = states
        .into_iter()
        .map(|(state, districts)| {
            let children: Vec<HierarchyNode> = districts
                .into_iter()
                .map(|(district, value)| HierarchyNode {
                    name: district.to_string(),
                    value,
                    children: Vec::new(),
                })
                .collect();
            HierarchyNode {
                name: state.to_string(),
                value: children.iter().map(|c| c.value).sum(),
                children,
            }
        })
        .collect();

    HierarchyNode {
        name: HIERARCHY_ROOT.to_string(),
        value: children.iter().map(|c| c.value).sum(),
        children,
    }
}

/// Records that carry coordinates, as map bubbles.
///
/// Records without coordinates are dropped here and only here.
#[must_use]
pub fn map_points(records: &[&CrimeRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| {
            r.coordinates.map(|c| MapPoint {
                state: r.state.clone(),
                district: r.district.clone(),
                year: r.year,
                latitude: c.latitude,
                longitude: c.longitude,
                total: r.total_ipc_crimes,
            })
        })
        .collect()
}
