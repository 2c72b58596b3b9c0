#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the IPC crime dashboard.
//!
//! Serves the dashboard page at `/` and a small JSON API under `/api`.
//! The crime dataset is loaded and geocoded once before the server
//! starts; afterwards it is immutable and shared between workers through
//! an [`Arc`], so request handling never takes a lock.

mod handlers;
pub mod page;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use ipc_dashboard_analytics_models::YearRange;
use ipc_dashboard_charts::ChartSize;
use ipc_dashboard_crime_models::CrimeRecord;

/// The dataset behind the dashboard, as it stood at startup.
#[derive(Debug, Clone)]
pub enum DashboardData {
    /// Records loaded (and enriched) successfully.
    Ready(Arc<Vec<CrimeRecord>>),
    /// The data source could not be reached; the page shows a warning.
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
}

impl DashboardData {
    /// Wraps loaded records.
    #[must_use]
    pub fn ready(records: Vec<CrimeRecord>) -> Self {
        Self::Ready(Arc::new(records))
    }

    /// Marks the data source as unavailable.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Loaded records, if any.
    #[must_use]
    pub fn records(&self) -> Option<&[CrimeRecord]> {
        match self {
            Self::Ready(records) => Some(records.as_slice()),
            Self::Unavailable { .. } => None,
        }
    }

    /// Full year range of the dataset, or `0-0` when it is empty.
    #[must_use]
    pub fn year_range(&self) -> YearRange {
        self.records()
            .and_then(ipc_dashboard_analytics::filter::full_year_range)
            .unwrap_or(YearRange::new(0, 0))
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dataset loaded at startup.
    pub data: DashboardData,
    /// Pixel size of each rendered chart.
    pub chart_size: ChartSize,
}

impl AppState {
    /// Creates state with the default chart size.
    #[must_use]
    pub fn new(data: DashboardData) -> Self {
        Self {
            data,
            chart_size: ChartSize::default(),
        }
    }
}

/// Registers the dashboard routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary))
            .route("/options", web::get().to(handlers::options)),
    );
}

/// Starts the dashboard server on `bind_addr:port`.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(state: AppState, bind_addr: &str, port: u16) -> std::io::Result<()> {
    match &state.data {
        DashboardData::Ready(records) => {
            log::info!("Serving {} crime records", records.len());
        }
        DashboardData::Unavailable { reason } => {
            log::warn!("Serving without data: {reason}");
        }
    }

    let state = web::Data::new(state);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
