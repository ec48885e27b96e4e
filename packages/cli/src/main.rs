#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for rendering and exporting justice metrics charts.
//!
//! ```text
//! justice_metrics charts
//! justice_metrics render <chart> --input api.json [--mode rates] [--current <category>] [--period 6]
//! justice_metrics export <chart> --input api.json [--format csv|json] [--output <path>]
//! ```
//!
//! `--input -` reads the API response from stdin. Set `RUST_LOG=debug` to
//! see what each chart built.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use justice_metrics_charts::{
    ChartError,
    config::DashboardConfig,
    export::{export, file_name},
    registry::{all_charts, find_chart},
    view::ChartView,
};
use justice_metrics_charts_models::{ChartPayload, DatasetBundle, ExportFormat};
use justice_metrics_models::MetricPeriod;

#[derive(Parser)]
#[command(
    name = "justice_metrics",
    about = "Render and export criminal-justice metrics charts"
)]
struct Cli {
    /// Dashboard config file (sentinel, default period, palette)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered charts
    Charts,
    /// Print a chart's render payload as JSON
    Render {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export a chart's data
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Export format
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Chart ID (see `charts`)
    chart: String,
    /// API response JSON file, or `-` for stdin
    #[arg(long)]
    input: PathBuf,
    /// Toggle mode control value (`counts` or `rates`)
    #[arg(long, default_value = "counts")]
    mode: String,
    /// Category to highlight (case-insensitive)
    #[arg(long)]
    current: Option<String>,
    /// Metric period in months (1, 3, 6, 12 or 36)
    #[arg(long)]
    period: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Charts => {
            let charts = all_charts();
            println!("{:<34} {:<6} TITLE", "ID", "RATES");
            println!("{}", "-".repeat(90));
            for chart in &charts {
                let rates = if chart.supports_mode_toggle() { "yes" } else { "no" };
                println!("{:<34} {:<6} {}", chart.id, rates, chart.title);
            }
            println!("\n{} chart(s)", charts.len());
        }
        Commands::Render { view } => {
            let payload = build_payload(&view, &config)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Export {
            view,
            format,
            output,
        } => {
            let payload = build_payload(&view, &config)?;
            let document = export(&payload, format)?;
            if let Some(path) = output {
                std::fs::write(&path, document)?;
                log::info!(
                    "Wrote {} to {}",
                    file_name(&payload, format),
                    path.display()
                );
            } else {
                print!("{document}");
            }
        }
    }

    Ok(())
}

fn build_payload(
    args: &ViewArgs,
    config: &DashboardConfig,
) -> Result<ChartPayload, Box<dyn std::error::Error>> {
    let definition = find_chart(&args.chart)?;
    let bundle = read_bundle(&args.input)?;

    for key in definition.dataset_keys() {
        if !bundle.contains(key) {
            log::warn!("Dataset '{key}' missing from input, chart will be empty");
        }
    }

    let period = match args.period {
        Some(months) => MetricPeriod::try_from(months)?,
        None => config.default_period,
    };

    let mut view = ChartView::new(definition, period);
    if !view.select_mode(&args.mode) && !args.mode.eq_ignore_ascii_case("counts") {
        log::warn!("Chart {} has no rate mode, rendering counts", args.chart);
    }
    view.set_current(args.current.clone());

    let today = chrono::Local::now().date_naive();
    Ok(view.payload(&bundle, config, today))
}

fn read_bundle(path: &Path) -> Result<DatasetBundle, ChartError> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(DatasetBundle::from_json_str(&json)?)
}
