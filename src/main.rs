//! CLI entry point for the climate chart tool.
//!
//! Summarizes station observation and projection payloads into chart
//! models, and writes the observation export.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use climate_charts::{
    catalog::{Catalog, StationMeta},
    chart::{ChartHeader, GridChart, InfoPanel, StationChart},
    config::ChartConfig,
    output::{print_json, print_pretty, write_export},
    parser::{parse_grid, parse_station},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "climate_charts")]
#[command(about = "Summarize climate series into chart data", long_about = None)]
struct Cli {
    /// Optional JSON chart config (window, boundary_year, trace, min_points)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Optional JSON element/season catalog replacing the built-in one
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Optional JSON station metadata file
    #[arg(long, global = true)]
    meta: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Station id
    #[arg(long)]
    sid: String,

    /// Element code (e.g. avgt, pcpn)
    #[arg(short, long, default_value = "avgt")]
    element: String,

    /// Season code (e.g. ANN, JJA)
    #[arg(short, long, default_value = "ANN")]
    season: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a station observation payload
    Station {
        /// Path to the station payload JSON
        #[arg(value_name = "FILE")]
        input: String,

        #[command(flatten)]
        target: Target,

        /// CSV file to write the observation export to
        #[arg(long)]
        csv: Option<String>,

        /// Year to select for the info panel
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Summarize a grid payload with projections for one station
    Grid {
        /// Path to the grid payload JSON
        #[arg(value_name = "FILE")]
        input: String,

        #[command(flatten)]
        target: Target,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/climate_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("climate_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    let meta = cli.meta.as_deref().map(StationMeta::load).transpose()?;
    print_pretty(&config);

    match cli.command {
        Commands::Station {
            input,
            target,
            csv,
            year,
        } => {
            let header =
                ChartHeader::new(&catalog, &meta, &target.sid, &target.element, &target.season);
            station(&input, &config, header, csv.as_deref(), year)?;
        }
        Commands::Grid { input, target } => {
            let header =
                ChartHeader::new(&catalog, &meta, &target.sid, &target.element, &target.season);
            grid(&input, &target.sid, &config, header)?;
        }
    }

    Ok(())
}

/// Builds the station chart, then writes the export and info panel if asked.
#[tracing::instrument(skip(config, header), fields(title = %header.title))]
fn station(
    input: &str,
    config: &ChartConfig,
    header: ChartHeader,
    csv: Option<&str>,
    year: Option<i32>,
) -> Result<()> {
    let json = std::fs::read_to_string(input)?;
    let series = parse_station(&json)?;
    let summary = config.observation().summarize(&series);

    let units = header.tooltip_units.clone();
    let chart = StationChart::build(&summary, header, year.unwrap_or_default());

    if !chart.coverage.is_sufficient() {
        warn!("Insufficient data coverage");
        return Ok(());
    }
    print_json(&chart)?;

    if let Some(path) = csv {
        let rows = write_export(path, &summary)?;
        info!(path, rows, "Export written");
    }

    if let Some(year) = year {
        let panel = InfoPanel::lookup(&summary.by_year, year, config.window, &units);
        info!("\n{}", panel);
    }

    Ok(())
}

/// Builds the grid chart for `sid` from both series of the payload.
#[tracing::instrument(skip(config, header), fields(title = %header.title))]
fn grid(input: &str, sid: &str, config: &ChartConfig, header: ChartHeader) -> Result<()> {
    let json = std::fs::read_to_string(input)?;
    let series = parse_grid(&json, sid)?;

    let projected = config.projection().summarize(&series.projected);
    let observed = config.observation().summarize(&series.observed);
    let chart = GridChart::build(&observed, &projected, header, config.min_points);

    if !chart.coverage.is_sufficient() {
        warn!(
            observed = observed.points.len(),
            min_points = config.min_points,
            "Insufficient data coverage"
        );
        return Ok(());
    }

    info!(
        historical = ?chart.period_means.historical,
        projected = ?chart.period_means.projected,
        "Period means"
    );
    print_json(&chart)
}
