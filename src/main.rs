//! CLI entry point for the car market analytics tool.
//!
//! Provides an `etl` subcommand that builds the enriched table from the
//! raw spec and sales sheets, plus one subcommand per aggregate query.
//! Queries reload the enriched CSV on every invocation and print JSON to
//! stdout.

use anyhow::Result;
use car_market_analytics::analytics::brand::brand_analysis;
use car_market_analytics::analytics::cars::all_cars;
use car_market_analytics::analytics::correlation::correlation_matrix;
use car_market_analytics::analytics::distribution::{metric_series, price_distribution};
use car_market_analytics::analytics::summary::summary;
use car_market_analytics::output::{print_json, write_enriched};
use car_market_analytics::pipeline::{self, Pipeline};
use car_market_analytics::table::Table;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "car_market_analytics")]
#[command(about = "Computes composite indices over a vehicle listings dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the enriched table from the raw spec and sales CSVs
    Etl {
        /// Vehicle specifications CSV
        #[arg(short = 's', long, default_value = "data/raw/mobil.csv")]
        specs: String,

        /// Wholesale sales CSV
        #[arg(short = 'w', long, default_value = "data/raw/wholesales.csv")]
        sales: String,

        /// Destination for the enriched CSV
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        output: String,

        /// Which derived columns to compute
        #[arg(short, long, value_enum, default_value_t = Pipeline::Indices)]
        pipeline: Pipeline,
    },
    /// Dump every enriched row as JSON records
    Cars {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
    /// KPI summary: counts, price statistics, metric averages
    Summary {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
    /// Car counts per rupiah price band
    PriceDistribution {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
    /// Full metric series per index/score, in row order
    IndexDistribution {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
    /// Per-brand rollup: averages, total sales, model count
    BrandAnalysis {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
    /// Pearson correlation matrix over price, power, and metrics
    Correlation {
        #[arg(short, long, default_value = "data/processed/car_indices.csv")]
        data: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/car_market_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("car_market_analytics.log"));

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

    match cli.command {
        Commands::Etl {
            specs,
            sales,
            output,
            pipeline,
        } => run_etl(&specs, &sales, &output, pipeline)?,
        Commands::Cars { data } => print_json(&all_cars(&Table::from_path(&data)?))?,
        Commands::Summary { data } => print_json(&summary(&Table::from_path(&data)?))?,
        Commands::PriceDistribution { data } => {
            print_json(&price_distribution(&Table::from_path(&data)?))?
        }
        Commands::IndexDistribution { data } => {
            print_json(&metric_series(&Table::from_path(&data)?))?
        }
        Commands::BrandAnalysis { data } => {
            print_json(&brand_analysis(&Table::from_path(&data)?))?
        }
        Commands::Correlation { data } => {
            print_json(&correlation_matrix(&Table::from_path(&data)?))?
        }
    }

    Ok(())
}

/// Loads both input sheets, runs the selected pipeline, and persists the
/// enriched table. Missing inputs abort before any output is written.
#[tracing::instrument]
fn run_etl(specs: &str, sales: &str, output: &str, pipeline: Pipeline) -> Result<()> {
    let spec_table = Table::from_path(specs)?;
    let sales_table = Table::from_path(sales)?;

    info!(
        spec_rows = spec_table.len(),
        sales_rows = sales_table.len(),
        "input sheets loaded"
    );

    let enriched = pipeline::run(spec_table, sales_table, pipeline)?;
    write_enriched(output, &enriched)?;

    info!(total_cars = enriched.len(), output, "ETL finished");
    Ok(())
}
