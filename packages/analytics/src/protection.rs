//! Weighted protection scores per district row.
//!
//! The score blends an inverse-distance term with size and staffing terms
//! normalized by the largest total in the view. All three inputs are
//! proxied by the row's total IPC crimes.

use ipc_dashboard_analytics_models::ProtectionLevel;
use ipc_dashboard_crime_models::CrimeRecord;

/// Weight of the inverse-distance term.
pub const W_DISTANCE: f64 = 0.4;
/// Weight of the normalized size term.
pub const W_SIZE: f64 = 0.3;
/// Weight of the normalized staffing term.
pub const W_STAFFING: f64 = 0.3;

/// Computes the protection score for a single set of inputs.
///
/// Returns `0.0` when any input or normalizer is zero.
#[must_use]
pub fn protection_level(
    distance: f64,
    size: f64,
    staffing: f64,
    max_size: f64,
    max_staffing: f64,
) -> f64 {
    if distance <= 0.0 || max_size <= 0.0 || max_staffing <= 0.0 {
        return 0.0;
    }

    let score_distance = 1.0 / distance;
    let score_size = size / max_size;
    let score_staffing = staffing / max_staffing;

    W_STAFFING.mul_add(
        score_staffing,
        W_DISTANCE.mul_add(score_distance, W_SIZE * score_size),
    ) / (W_DISTANCE + W_SIZE + W_STAFFING)
}

/// Scores every record in the view, in view order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn protection_levels(records: &[&CrimeRecord]) -> Vec<ProtectionLevel> {
    let max = records
        .iter()
        .map(|r| r.total_ipc_crimes)
        .max()
        .unwrap_or(0) as f64;

    records
        .iter()
        .map(|r| {
            let total = r.total_ipc_crimes as f64;
            ProtectionLevel {
                district: r.district.clone(),
                state: r.state.clone(),
                year: r.year,
                total: r.total_ipc_crimes,
                level: protection_level(total, total, total, max, max),
                coordinates: r.coordinates,
            }
        })
        .collect()
}
