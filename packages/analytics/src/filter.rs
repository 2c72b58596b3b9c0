//! Record filtering and selector options.

use std::collections::BTreeSet;

use ipc_dashboard_analytics_models::{Selection, SelectorOptions, YearRange};
use ipc_dashboard_crime_models::CrimeRecord;

/// Records whose year lies in `years` (inclusive).
#[must_use]
pub fn filter_year_range(records: &[CrimeRecord], years: YearRange) -> Vec<&CrimeRecord> {
    records.iter().filter(|r| years.contains(r.year)).collect()
}

/// Records matching the full selection: year in range, state selected and
/// district selected.
///
/// An empty state or district set matches nothing, so a viewer who has
/// picked districts but no states gets an empty result.
#[must_use]
pub fn filter_records<'a>(records: &'a [CrimeRecord], selection: &Selection) -> Vec<&'a CrimeRecord> {
    records
        .iter()
        .filter(|r| selection.years.contains(r.year))
        .filter(|r| selection.states.contains(&r.state))
        .filter(|r| selection.districts.contains(&r.district))
        .collect()
}

/// Distinct years present in `records`, ascending.
#[must_use]
pub fn available_years(records: &[CrimeRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct state names, sorted.
#[must_use]
pub fn available_states(records: &[CrimeRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.state.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Distinct district names, sorted.
///
/// When `states` is non-empty only districts of those states are listed;
/// otherwise every district is.
#[must_use]
pub fn available_districts(records: &[CrimeRecord], states: &BTreeSet<String>) -> Vec<String> {
    records
        .iter()
        .filter(|r| states.is_empty() || states.contains(&r.state))
        .map(|r| r.district.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// All selector options for the current state choice.
#[must_use]
pub fn selector_options(records: &[CrimeRecord], states: &BTreeSet<String>) -> SelectorOptions {
    SelectorOptions {
        years: available_years(records),
        states: available_states(records),
        districts: available_districts(records, states),
    }
}

/// The full year range covered by `records`, if any.
#[must_use]
pub fn full_year_range(records: &[CrimeRecord]) -> Option<YearRange> {
    let min = records.iter().map(|r| r.year).min()?;
    let max = records.iter().map(|r| r.year).max()?;
    Some(YearRange::new(min, max))
}
