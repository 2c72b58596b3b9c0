//! Seeded synthetic dataset for running the dashboard without a database.
//!
//! Rows are drawn uniformly from a handful of states and districts with
//! coordinates already filled in (somewhere inside India's bounding box),
//! so no geocoding is needed.

use ipc_dashboard_crime_models::{Coordinates, CrimeRecord, Offense, OffenseCounts};
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;
use rand::{Rng as _, SeedableRng as _};

/// Seed used by [`demo_records`].
pub const DEMO_SEED: u64 = 42;

/// Number of rows produced by [`demo_records`].
pub const DEMO_ROWS: usize = 100;

const STATES: &[&str] = &["TamilNadu", "Kerala", "Karnataka", "Maharashtra"];
const DISTRICTS: &[&str] = &["Madurai", "Cuddalore", "Coimbatore", "cochin"];

/// Generates `rows` synthetic records from `seed`.
#[must_use]
pub fn generate(seed: u64, rows: usize) -> Vec<CrimeRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..rows)
        .map(|_| {
            let year = rng.gen_range(2000..2023);
            let state = STATES.choose(&mut rng).copied().unwrap_or(STATES[0]);
            let district = DISTRICTS.choose(&mut rng).copied().unwrap_or(DISTRICTS[0]);
            let total = rng.gen_range(50..500);
            let latitude = rng.gen_range(8.0..37.0);
            let longitude = rng.gen_range(68.0..98.0);

            let mut offenses = OffenseCounts::default();
            for offense in Offense::all() {
                offenses.set(*offense, rng.gen_range(5..50));
            }

            CrimeRecord::new(year, state, district, total, offenses)
                .with_coordinates(Coordinates::new(latitude, longitude))
        })
        .collect()
}

/// The default demo dataset: [`DEMO_ROWS`] rows seeded with [`DEMO_SEED`].
#[must_use]
pub fn demo_records() -> Vec<CrimeRecord> {
    generate(DEMO_SEED, DEMO_ROWS)
}
