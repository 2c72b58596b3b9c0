//! One-shot load of the crime statistics table from `DuckDB`.
//!
//! The table is expected to carry the source column names verbatim
//! (`YEAR`, `STATE/UT`, `DISTRICT`, `TOTAL IPC CRIMES` and one column per
//! [`Offense`]). Missing columns reject the whole dataset instead of
//! producing empty charts downstream.

use std::path::Path;

use duckdb::{AccessMode, Config, Connection};
use ipc_dashboard_crime_models::{CrimeRecord, Offense, OffenseCounts};

use crate::DbError;

/// Default name of the statistics table.
pub const DEFAULT_TABLE: &str = "crime_data";

/// Column holding the statistics year.
pub const YEAR_COLUMN: &str = "YEAR";
/// Column holding the state / union territory name.
pub const STATE_COLUMN: &str = "STATE/UT";
/// Column holding the district name.
pub const DISTRICT_COLUMN: &str = "DISTRICT";
/// Column holding the total IPC crime count.
pub const TOTAL_COLUMN: &str = "TOTAL IPC CRIMES";

/// Opens the statistics database read-only.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `path` does not exist, or
/// [`DbError::Connection`] if `DuckDB` refuses to open it.
pub fn open_read_only(path: &Path) -> Result<Connection, DbError> {
    if !path.exists() {
        return Err(DbError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let config = Config::default()
        .access_mode(AccessMode::ReadOnly)
        .map_err(DbError::Connection)?;

    Connection::open_with_flags(path, config).map_err(DbError::Connection)
}

/// Returns every column the loader reads, in `SELECT` order.
#[must_use]
pub fn required_columns() -> Vec<String> {
    let mut columns = vec![
        YEAR_COLUMN.to_string(),
        STATE_COLUMN.to_string(),
        DISTRICT_COLUMN.to_string(),
        TOTAL_COLUMN.to_string(),
    ];
    columns.extend(Offense::all().iter().map(ToString::to_string));
    columns
}

/// Wraps an identifier in double quotes, escaping embedded quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Verifies that `table` exists and carries every required column.
///
/// # Errors
///
/// Returns [`DbError::MissingTable`] or [`DbError::MissingColumn`] when
/// the schema does not match.
pub fn validate_schema(conn: &Connection, table: &str) -> Result<(), DbError> {
    let mut stmt =
        conn.prepare("SELECT column_name FROM information_schema.columns WHERE table_name = ?")?;
    let present = stmt
        .query_map(duckdb::params![table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if present.is_empty() {
        return Err(DbError::MissingTable {
            table: table.to_string(),
        });
    }

    for column in required_columns() {
        if !present.iter().any(|c| *c == column) {
            return Err(DbError::MissingColumn {
                table: table.to_string(),
                column,
            });
        }
    }

    Ok(())
}

fn count_from(value: Option<i64>, column: &str, year: i32) -> Result<u64, DbError> {
    let value = value.ok_or_else(|| DbError::Conversion {
        message: format!("NULL '{column}' in row for year {year}"),
    })?;

    u64::try_from(value).map_err(|_| DbError::Conversion {
        message: format!("negative '{column}' ({value}) in row for year {year}"),
    })
}

/// Loads every row of `table` as a [`CrimeRecord`].
///
/// Records come back without coordinates; geocode enrichment fills them
/// in afterwards.
///
/// # Errors
///
/// Returns [`DbError`] if the schema is invalid, the query fails, or a
/// value cannot be converted.
pub fn load_records(conn: &Connection, table: &str) -> Result<Vec<CrimeRecord>, DbError> {
    validate_schema(conn, table)?;

    let offense_selects: Vec<String> = Offense::all()
        .iter()
        .map(|o| format!("CAST({} AS BIGINT)", quote_ident(o.as_ref())))
        .collect();

    let sql = format!(
        "SELECT CAST({year} AS INTEGER), CAST({state} AS VARCHAR), CAST({district} AS VARCHAR), \
         CAST({total} AS BIGINT), {offenses} FROM {table}",
        year = quote_ident(YEAR_COLUMN),
        state = quote_ident(STATE_COLUMN),
        district = quote_ident(DISTRICT_COLUMN),
        total = quote_ident(TOTAL_COLUMN),
        offenses = offense_selects.join(", "),
        table = quote_ident(table),
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        let year: Option<i32> = row.get(0)?;
        let year = year.ok_or_else(|| DbError::Conversion {
            message: format!("NULL '{YEAR_COLUMN}' in row {}", records.len() + 1),
        })?;
        let state: Option<String> = row.get(1)?;
        let district: Option<String> = row.get(2)?;
        let total = count_from(row.get(3)?, TOTAL_COLUMN, year)?;

        let mut offenses = OffenseCounts::default();
        for (i, offense) in Offense::all().iter().enumerate() {
            let count = count_from(row.get(4 + i)?, offense.as_ref(), year)?;
            offenses.set(*offense, count);
        }

        records.push(CrimeRecord::new(
            year,
            state.unwrap_or_default(),
            district.unwrap_or_default(),
            total,
            offenses,
        ));
    }

    log::info!("Loaded {} records from '{table}'", records.len());

    Ok(records)
}

/// Opens the database at `path` and loads `table` in one go.
///
/// # Errors
///
/// Returns [`DbError`] if opening or loading fails.
pub fn load_from_path(path: &Path, table: &str) -> Result<Vec<CrimeRecord>, DbError> {
    log::info!("Opening crime database at {}", path.display());
    let conn = open_read_only(path)?;
    load_records(&conn, table)
}
