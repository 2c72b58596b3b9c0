//! Startup pipeline: load the dataset, then geocode-enrich it.
//!
//! Runs once, sequentially, before the dashboard is served or rendered.

use std::path::{Path, PathBuf};

use ipc_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use ipc_dashboard_crime_models::CrimeRecord;
use ipc_dashboard_database::{db, demo, paths};
use ipc_dashboard_geocoder::GeocodeError;
use ipc_dashboard_geocoder::cache::CachedGeocoder;
use ipc_dashboard_geocoder::enrich::enrich_records;
use ipc_dashboard_geocoder::nominatim::NominatimProvider;
use ipc_dashboard_geocoder::service_registry::{self, GeocodingService};
use ipc_dashboard_server::DashboardData;

/// Where the crime records come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A `DuckDB` file and the table to read.
    Database {
        /// Database file.
        path: PathBuf,
        /// Table name.
        table: String,
    },
    /// The seeded random dataset.
    Demo,
}

impl DataSource {
    /// Resolves CLI arguments into a source.
    #[must_use]
    pub fn from_args(demo: bool, path: Option<PathBuf>, table: String) -> Self {
        if demo {
            Self::Demo
        } else {
            Self::Database {
                path: path.unwrap_or_else(paths::default_database_path),
                table,
            }
        }
    }
}

/// Loads records from `source`.
///
/// An unreachable database degrades to [`DashboardData::Unavailable`];
/// schema and conversion errors are returned.
///
/// # Errors
///
/// Returns the [`ipc_dashboard_database::DbError`] if the table is
/// malformed.
pub fn load(source: &DataSource) -> Result<DashboardData, ipc_dashboard_database::DbError> {
    match source {
        DataSource::Demo => {
            let records = demo::demo_records();
            log::info!("Using {} demo records", records.len());
            Ok(DashboardData::ready(records))
        }
        DataSource::Database { path, table } => match db::load_from_path(path, table) {
            Ok(records) => {
                log::info!(
                    "Loaded {} records from {} ({table})",
                    records.len(),
                    path.display()
                );
                Ok(DashboardData::ready(records))
            }
            Err(e) if e.is_unavailable() => {
                log::error!("Error connecting to the database: {e}");
                Ok(DashboardData::unavailable(e.to_string()))
            }
            Err(e) => Err(e),
        },
    }
}

/// Reads the geocoding service config, falling back to the embedded one.
///
/// # Errors
///
/// Returns [`GeocodeError::Config`] if `path` cannot be read or parsed.
pub fn geocoding_service(path: Option<&Path>) -> Result<GeocodingService, GeocodeError> {
    path.map_or_else(
        || Ok(service_registry::nominatim()),
        service_registry::load_from_file,
    )
}

/// Builds the cached, rate-limited Nominatim geocoder for `service`.
///
/// # Errors
///
/// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
pub fn geocoder(
    service: &GeocodingService,
) -> Result<CachedGeocoder<NominatimProvider>, GeocodeError> {
    let provider = NominatimProvider::from_service(service)?;
    Ok(CachedGeocoder::new(provider, service.retry_policy()).with_min_interval(service.rate_limit()))
}

/// Geocodes every distinct state in `records` in place.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the geocoder cannot be configured. Lookup
/// failures are not errors; those records just stay unlocated.
pub async fn enrich(
    records: &mut [CrimeRecord],
    service: &GeocodingService,
    multi: &MultiProgress,
) -> Result<(), GeocodeError> {
    let mut geocoder = geocoder(service)?;
    let progress = IndicatifProgress::regions_bar(multi, "Geocoding regions");

    let summary = enrich_records(&mut geocoder, records, &progress).await;
    if !summary.failed.is_empty() {
        log::warn!(
            "Could not geocode {} regions: {}",
            summary.failed.len(),
            summary.failed.join(", ")
        );
    }

    Ok(())
}

/// Loads `source` and, unless `skip_geocode` is set, enriches the records.
///
/// # Errors
///
/// Returns an error if the table is malformed or the geocoder cannot be
/// configured.
pub async fn prepare(
    source: &DataSource,
    geocoder_config: Option<&Path>,
    skip_geocode: bool,
    multi: &MultiProgress,
) -> Result<DashboardData, Box<dyn std::error::Error>> {
    let data = load(source)?;

    let DashboardData::Ready(records) = data else {
        return Ok(data);
    };

    if skip_geocode {
        log::info!("Skipping geocoding");
        return Ok(DashboardData::Ready(records));
    }

    let service = geocoding_service(geocoder_config)?;
    let mut records = std::sync::Arc::unwrap_or_clone(records);
    enrich(&mut records, &service, multi).await?;

    Ok(DashboardData::ready(records))
}
