//! CLI entry point for the atmospheric comfort rater.
//!
//! Provides subcommands for serving the analysis HTTP API, scoring a single
//! coordinate from the terminal, bulk-downloading MERRA-2 archive files, and
//! validating climatology predictions against recent daily actuals.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use atmo_rater::infra::merra::MerraArchive;
use atmo_rater::infra::power::PowerClient;
use atmo_rater::models::{ComfortProfile, ScoreWeights};
use atmo_rater::scoring::evaluate::MISSING_THRESHOLD;
use atmo_rater::scoring::region::evaluate_point;
use atmo_rater::scoring::utility::round_to;
use atmo_rater::services::ClimatologyProvider;
use atmo_rater::validation::{self, Location, ValidationRecord};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::Instrument;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "atmo_rater")]
#[command(about = "Climate comfort analysis backed by NASA POWER data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the analysis HTTP API
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Score a single coordinate and print the result as pretty JSON
    Point {
        /// Latitude in degrees
        #[arg(value_name = "LAT", allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(value_name = "LON", allow_negative_numbers = true)]
        lon: f64,

        /// Calendar month, 1-12
        #[arg(short, long)]
        month: u32,

        /// Coldest acceptable average temperature, in °C
        #[arg(long, default_value_t = 10.0)]
        temp_min: f64,

        /// Hottest acceptable average temperature, in °C
        #[arg(long, default_value_t = 25.0)]
        temp_max: f64,

        /// Highest acceptable average wind speed, in m/s
        #[arg(long, default_value_t = 15.0)]
        wind_max: f64,

        /// Highest acceptable estimated rain chance, in percent
        #[arg(long, default_value_t = 20.0)]
        rain_chance_max: f64,

        /// Highest acceptable relative humidity, in percent
        #[arg(long, default_value_t = 80.0)]
        humidity_max: f64,
    },
    /// Bulk-download MERRA-2 archive files for one calendar day across years
    Download {
        /// Calendar month of the target day
        #[arg(short, long, default_value_t = 8)]
        month: u32,

        /// Day of the month
        #[arg(short, long, default_value_t = 15)]
        day: u32,

        /// First year to download
        #[arg(short, long, default_value_t = 1980)]
        start_year: i32,

        /// Last year to download
        #[arg(short, long, default_value_t = 2023)]
        end_year: i32,

        /// Directory to save archive files into
        #[arg(short, long, default_value = "data")]
        output_dir: String,
    },
    /// Check climatology predictions against recent daily actuals
    Validate {
        /// JSON file with locations to test
        #[arg(value_name = "LOCATIONS_FILE")]
        locations: String,

        /// Calendar month of the target day
        #[arg(short, long, default_value_t = 8)]
        month: u32,

        /// Day of the month
        #[arg(short, long, default_value_t = 15)]
        day: u32,

        /// First year of ground-truth actuals
        #[arg(short, long, default_value_t = 2020)]
        start_year: i32,

        /// Last year of ground-truth actuals
        #[arg(short, long, default_value_t = 2024)]
        end_year: i32,

        /// How far a correct prediction may be off, in °C
        #[arg(short, long, default_value_t = 2.5)]
        tolerance: f64,

        /// CSV file to append accuracy records to
        #[arg(short, long, default_value = "validation.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/atmo_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("atmo_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let api_key = std::env::var("NASA_API_KEY").ok();
            if api_key.is_some() {
                info!("NASA POWER api_key configured");
            }

            let provider: Arc<dyn ClimatologyProvider> = Arc::new(PowerClient::new(api_key));
            atmo_rater::server::serve(provider, &bind).await?;
        }
        Commands::Point {
            lat,
            lon,
            month,
            temp_min,
            temp_max,
            wind_max,
            rain_chance_max,
            humidity_max,
        } => {
            let profile = ComfortProfile {
                temp_min,
                temp_max,
                wind_max,
                rain_chance_max,
                humidity_max,
            };

            let api_key = std::env::var("NASA_API_KEY").ok();
            let provider = PowerClient::new(api_key);

            let result =
                evaluate_point(&provider, lat, lon, month, &profile, &ScoreWeights::default())
                    .await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Download {
            month,
            day,
            start_year,
            end_year,
            output_dir,
        } => {
            let token = std::env::var("NASA_TOKEN").expect("NASA_TOKEN must be set");
            let archive = MerraArchive::new(token);

            let completed = archive
                .download_range(month, day, start_year, end_year, Path::new(&output_dir))
                .await?;

            info!(completed, output_dir, "Download run finished");
        }
        Commands::Validate {
            locations,
            month,
            day,
            start_year,
            end_year,
            tolerance,
            output,
        } => {
            let locations = validation::load_locations(&locations)?;
            validate_locations(locations, month, day, start_year, end_year, tolerance, &output)
                .await?;
        }
    }

    Ok(())
}

/// Validates every location concurrently and appends the results to CSV.
#[tracing::instrument(skip(locations, output), fields(location_count = locations.len()))]
async fn validate_locations(
    locations: Vec<Location>,
    month: u32,
    day: u32,
    start_year: i32,
    end_year: i32,
    tolerance: f64,
    output: &str,
) -> Result<()> {
    let api_key = std::env::var("NASA_API_KEY").ok();
    let client = Arc::new(PowerClient::new(api_key));

    let mut tasks = vec![];

    for location in locations {
        let client = client.clone();

        let location_span = tracing::info_span!("validate_location", name = %location.name);

        let task = tokio::spawn(
            async move {
                match validate_location(
                    &client, &location, month, day, start_year, end_year, tolerance,
                )
                .await
                {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(error = %e, "Validation failed for location");
                        None
                    }
                }
            }
            .instrument(location_span),
        );

        tasks.push(task);
    }

    let mut records = vec![];
    for task in tasks {
        if let Ok(Some(record)) = task.await {
            records.push(record);
        }
    }

    // Appends happen after the joins so rows never interleave
    for record in &records {
        validation::append_record(output, record)?;
    }

    if records.is_empty() {
        warn!("No locations produced an accuracy result");
    } else {
        let overall =
            records.iter().map(|r| r.accuracy_percent).sum::<f64>() / records.len() as f64;
        info!(
            locations = records.len(),
            overall_accuracy = round_to(overall, 1),
            output,
            "Validation summary"
        );
    }

    Ok(())
}

/// Fetches a location's prediction and actuals and scores the prediction.
async fn validate_location(
    client: &PowerClient,
    location: &Location,
    month: u32,
    day: u32,
    start_year: i32,
    end_year: i32,
    tolerance: f64,
) -> Result<ValidationRecord> {
    let stats = client
        .monthly_climatology(location.lat, location.lon, month)
        .await?;
    let predicted = stats
        .temp_avg
        .filter(|t| *t > MISSING_THRESHOLD)
        .ok_or_else(|| anyhow::anyhow!("no climatology prediction for {}", location.name))?;

    let series = client
        .daily_temperatures(location.lat, location.lon, start_year, end_year)
        .await?;
    let actuals = validation::actuals_for_day(&series, month, day);

    let accuracy = validation::accuracy_percent(predicted, &actuals, tolerance)
        .ok_or_else(|| anyhow::anyhow!("no daily actuals for {}", location.name))?;

    info!(
        predicted = round_to(predicted, 1),
        actual_count = actuals.len(),
        accuracy = round_to(accuracy, 1),
        "Location validated"
    );

    Ok(ValidationRecord {
        timestamp: Utc::now(),
        name: location.name.clone(),
        lat: location.lat,
        lon: location.lon,
        month,
        day,
        predicted_temp: round_to(predicted, 1),
        actual_count: actuals.len(),
        accuracy_percent: round_to(accuracy, 1),
    })
}
