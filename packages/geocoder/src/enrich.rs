//! Attaches geocoded coordinates to loaded crime records.
//!
//! Each record is located by its state name. Lookups run sequentially,
//! once per distinct state, in first-appearance order. Records that
//! already carry coordinates are left alone, and records whose state
//! cannot be resolved stay without coordinates.

use std::collections::BTreeMap;
use std::sync::Arc;

use ipc_dashboard_crime_models::{Coordinates, CrimeRecord};

use crate::GeocodeProvider;
use crate::cache::CachedGeocoder;
use crate::progress::ProgressCallback;

/// Outcome of an enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Distinct region names looked up.
    pub regions: usize,
    /// Regions that resolved to coordinates.
    pub resolved: usize,
    /// Region names that could not be resolved (including empty names).
    pub failed: Vec<String>,
    /// Records that received coordinates.
    pub records_located: usize,
}

/// Returns the distinct state names of records lacking coordinates, in
/// first-appearance order.
#[must_use]
pub fn regions_to_resolve(records: &[CrimeRecord]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    records
        .iter()
        .filter(|r| r.coordinates.is_none())
        .filter(|r| seen.insert(r.state.as_str()))
        .map(|r| r.state.clone())
        .collect()
}

/// Geocodes every distinct state in `records` and fills in coordinates.
pub async fn enrich_records<P: GeocodeProvider>(
    geocoder: &mut CachedGeocoder<P>,
    records: &mut [CrimeRecord],
    progress: &Arc<dyn ProgressCallback>,
) -> EnrichSummary {
    let regions = regions_to_resolve(records);
    let mut summary = EnrichSummary {
        regions: regions.len(),
        ..EnrichSummary::default()
    };

    progress.set_total(regions.len() as u64);

    let mut located: BTreeMap<String, Coordinates> = BTreeMap::new();
    for region in regions {
        progress.set_message(format!("Geocoding {region}"));

        match geocoder.geocode(&region).await {
            Some(found) => {
                log::debug!("'{region}' -> {}", found.display_name);
                summary.resolved += 1;
                located.insert(region, found.coordinates());
            }
            None => {
                if region.is_empty() {
                    log::warn!("Skipping records with an empty state name");
                }
                summary.failed.push(region);
            }
        }

        progress.inc(1);
    }

    for record in records.iter_mut().filter(|r| r.coordinates.is_none()) {
        if let Some(coords) = located.get(&record.state) {
            record.coordinates = Some(*coords);
            summary.records_located += 1;
        }
    }

    progress.finish(format!(
        "Geocoded {}/{} regions",
        summary.resolved, summary.regions
    ));

    log::info!(
        "Geocode enrichment: {}/{} regions resolved, {} records located, {} cache hits, {} requests",
        summary.resolved,
        summary.regions,
        summary.records_located,
        geocoder.stats().cache_hits,
        geocoder.stats().attempts,
    );

    summary
}
