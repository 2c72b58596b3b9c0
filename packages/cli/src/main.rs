#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the IPC crime dashboard.
//!
//! Loads the crime statistics once, geocodes each state through a cached
//! Nominatim client, then either serves the dashboard (`serve`), writes
//! it to an HTML file (`render`), or looks up a single region
//! (`geocode`).
//!
//! Uses `indicatif-log-bridge` (via [`ipc_dashboard_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the geocoding progress bar never fight for the terminal.

mod pipeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ipc_dashboard_database::{db, paths};
use ipc_dashboard_server::AppState;
use ipc_dashboard_server_models::DashboardQuery;

use crate::pipeline::DataSource;

#[derive(Parser)]
#[command(name = "ipc_dashboard", about = "IPC crime statistics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        #[command(flatten)]
        data: DataArgs,
        /// Address to bind
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Render the dashboard to a standalone HTML file
    Render {
        #[command(flatten)]
        data: DataArgs,
        /// Output file (defaults to `data/generated/dashboard.html`)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// First year of the range
        #[arg(long)]
        start_year: Option<i32>,
        /// Last year of the range
        #[arg(long)]
        end_year: Option<i32>,
        /// State to select (repeatable)
        #[arg(long = "state")]
        states: Vec<String>,
        /// District to select (repeatable)
        #[arg(long = "district")]
        districts: Vec<String>,
    },
    /// Geocode a single region name and print its coordinates
    Geocode {
        /// Region to look up
        name: String,
        /// Geocoding service TOML (defaults to the embedded Nominatim config)
        #[arg(long)]
        geocoder_config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DataArgs {
    /// `DuckDB` database file (defaults to `data/crime.duckdb`)
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<PathBuf>,
    /// Table holding the crime statistics
    #[arg(long, default_value = db::DEFAULT_TABLE)]
    table: String,
    /// Use the seeded demo dataset instead of the database
    #[arg(long)]
    demo: bool,
    /// Geocoding service TOML (defaults to the embedded Nominatim config)
    #[arg(long)]
    geocoder_config: Option<PathBuf>,
    /// Skip geocoding; unlocated records are left off the maps
    #[arg(long)]
    skip_geocode: bool,
}

impl DataArgs {
    async fn prepare(
        self,
        multi: &ipc_dashboard_cli_utils::MultiProgress,
    ) -> Result<ipc_dashboard_server::DashboardData, Box<dyn std::error::Error>> {
        let source = DataSource::from_args(self.demo, self.database, self.table);
        pipeline::prepare(
            &source,
            self.geocoder_config.as_deref(),
            self.skip_geocode,
            multi,
        )
        .await
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = ipc_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, bind, port } => {
            let state = AppState::new(data.prepare(&multi).await?);

            // The server uses actix-web's runtime, so run it in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(ipc_dashboard_server::run_server(state, &bind, port))
            })
            .await??;
        }
        Commands::Render {
            data,
            output,
            start_year,
            end_year,
            states,
            districts,
        } => {
            let state = AppState::new(data.prepare(&multi).await?);
            let query = DashboardQuery {
                start_year,
                end_year,
                states,
                districts,
            };

            let output = match output {
                Some(path) => path,
                None => {
                    let dir = paths::generated_dir();
                    paths::ensure_dir(&dir)?;
                    dir.join("dashboard.html")
                }
            };

            let html =
                ipc_dashboard_server::page::render_page(&state.data, &query, state.chart_size)?;
            std::fs::write(&output, html)?;
            log::info!("Dashboard written to {}", output.display());
        }
        Commands::Geocode {
            name,
            geocoder_config,
        } => {
            let service = pipeline::geocoding_service(geocoder_config.as_deref())?;
            let mut geocoder = pipeline::geocoder(&service)?;

            match geocoder.geocode(&name).await {
                Some(region) => {
                    println!(
                        "{name}: {:.6}, {:.6} ({})",
                        region.latitude, region.longitude, region.display_name
                    );
                }
                None => return Err(format!("Could not geocode '{name}'").into()),
            }
        }
    }

    Ok(())
}
