#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Data access for the IPC crime dashboard.
//!
//! The dashboard reads its statistics table exactly once per process from
//! a `DuckDB` file ([`db`]). A seeded synthetic dataset ([`demo`]) can
//! stand in for the database when none is available.

pub mod db;
pub mod demo;
pub mod paths;

use std::path::PathBuf;

/// Errors that can occur while loading the statistics table.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The database file does not exist.
    #[error("Database not found at {}", path.display())]
    NotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// Opening the database failed.
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] duckdb::Error),

    /// Query error.
    #[error("Database error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// The configured table does not exist.
    #[error("Table '{table}' not found")]
    MissingTable {
        /// Table name that was queried.
        table: String,
    },

    /// A required column is missing from the table.
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn {
        /// Table name that was queried.
        table: String,
        /// Name of the missing column.
        column: String,
    },

    /// A value could not be converted to the record model.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// Returns `true` if the error means the data source could not be
    /// reached at all (as opposed to being reachable but malformed).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Connection(_) | Self::Io(_))
    }
}
