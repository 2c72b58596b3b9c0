#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime record and offense category types for the IPC crime dashboard.
//!
//! A [`CrimeRecord`] is one row of the district-level statistics table:
//! a `(year, state, district)` key, the total IPC crime count, the counts
//! for each tracked [`Offense`], and (after geocode enrichment) the
//! approximate [`Coordinates`] of the record's state.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Offense categories broken out individually in the statistics table.
///
/// The serialized names are exactly the source column names, so they can
/// be used both as SQL identifiers and as chart labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Offense {
    /// Murder.
    #[serde(rename = "MURDER")]
    #[strum(serialize = "MURDER")]
    Murder,
    /// Rape.
    #[serde(rename = "RAPE")]
    #[strum(serialize = "RAPE")]
    Rape,
    /// Kidnapping and abduction.
    #[serde(rename = "KIDNAPPING & ABDUCTION")]
    #[strum(serialize = "KIDNAPPING & ABDUCTION")]
    KidnappingAbduction,
    /// Robbery.
    #[serde(rename = "ROBBERY")]
    #[strum(serialize = "ROBBERY")]
    Robbery,
    /// Burglary.
    #[serde(rename = "BURGLARY")]
    #[strum(serialize = "BURGLARY")]
    Burglary,
    /// Theft.
    #[serde(rename = "THEFT")]
    #[strum(serialize = "THEFT")]
    Theft,
}

impl Offense {
    /// Number of tracked offenses.
    pub const COUNT: usize = 6;

    /// Returns all offenses in display order.
    #[must_use]
    pub const fn all() -> &'static [Self; Self::COUNT] {
        &[
            Self::Murder,
            Self::Rape,
            Self::KidnappingAbduction,
            Self::Robbery,
            Self::Burglary,
            Self::Theft,
        ]
    }

    /// Position of this offense in [`Offense::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-offense counts, indexed in [`Offense::all`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseCounts([u64; Offense::COUNT]);

impl OffenseCounts {
    /// Creates counts from an array ordered like [`Offense::all`].
    #[must_use]
    pub const fn new(counts: [u64; Offense::COUNT]) -> Self {
        Self(counts)
    }

    /// Returns the count for a single offense.
    #[must_use]
    pub const fn get(&self, offense: Offense) -> u64 {
        self.0[offense.index()]
    }

    /// Sets the count for a single offense.
    pub const fn set(&mut self, offense: Offense, count: u64) {
        self.0[offense.index()] = count;
    }

    /// Adds `other` into `self`, offense by offense.
    pub fn accumulate(&mut self, other: &Self) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += *b;
        }
    }

    /// Sum across all offenses.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Iterates `(offense, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Offense, u64)> + '_ {
        Offense::all().iter().copied().zip(self.0.iter().copied())
    }
}

/// A WGS84 coordinate pair.
///
/// Latitude and longitude only ever travel together: a record either has
/// both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A resolved geocoding result for a region name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedRegion {
    /// Canonical place name returned by the geocoder.
    pub display_name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl GeocodedRegion {
    /// Coordinates of the resolved region.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// One row of the district-level crime statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Calendar year of the statistics.
    pub year: i32,
    /// State or union territory name.
    pub state: String,
    /// District name.
    pub district: String,
    /// Total IPC crimes recorded.
    pub total_ipc_crimes: u64,
    /// Counts for the individually tracked offenses.
    pub offenses: OffenseCounts,
    /// Approximate location of the record's state, once geocoded.
    pub coordinates: Option<Coordinates>,
}

impl CrimeRecord {
    /// Creates a record without coordinates.
    #[must_use]
    pub fn new(
        year: i32,
        state: impl Into<String>,
        district: impl Into<String>,
        total_ipc_crimes: u64,
        offenses: OffenseCounts,
    ) -> Self {
        Self {
            year,
            state: state.into(),
            district: district.into(),
            total_ipc_crimes,
            offenses,
            coordinates: None,
        }
    }

    /// Returns a copy of this record located at `coordinates`.
    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offense_names_match_columns() {
        let names: Vec<String> = Offense::all().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec![
                "MURDER",
                "RAPE",
                "KIDNAPPING & ABDUCTION",
                "ROBBERY",
                "BURGLARY",
                "THEFT"
            ]
        );
    }

    #[test]
    fn offense_parses_column_name() {
        let parsed: Offense = "KIDNAPPING & ABDUCTION".parse().unwrap();
        assert_eq!(parsed, Offense::KidnappingAbduction);
    }

    #[test]
    fn offense_index_matches_position() {
        for (i, offense) in Offense::all().iter().enumerate() {
            assert_eq!(offense.index(), i);
        }
    }

    #[test]
    fn offense_counts_accumulate() {
        let mut a = OffenseCounts::new([1, 2, 3, 4, 5, 6]);
        a.accumulate(&OffenseCounts::new([10, 10, 10, 10, 10, 10]));
        assert_eq!(a.get(Offense::Murder), 11);
        assert_eq!(a.get(Offense::Theft), 16);
        assert_eq!(a.total(), 81);
    }

    #[test]
    fn record_serializes_offense_keys() {
        let record = CrimeRecord::new(2012, "KERALA", "ERNAKULAM", 60, OffenseCounts::default())
            .with_coordinates(Coordinates::new(10.0, 76.0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["totalIpcCrimes"], 60);
        assert_eq!(json["coordinates"]["latitude"], 10.0);
    }
}
