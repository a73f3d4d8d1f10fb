//! CLI entry point for the flight price rater.
//!
//! Reads a ';'-delimited flight results export, summarizes prices per
//! airline and departure slot, and ranks flights by cost-effectiveness.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use flight_rater::config::AnalysisConfig;
use flight_rater::output::{
    FLIGHT_HEADERS, HeatmapTable, SUMMARY_HEADERS, build_slot_labels, print_json, print_pretty,
    summary_rows, top_flight_rows, write_heatmap, write_report_json, write_rows,
};
use flight_rater::pipeline::{AnalysisReport, analyze};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "flight_rater")]
#[command(about = "A tool to analyze flight price exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an export and write summary, heatmap and ranking files
    Analyze {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Directory to write results into
        #[arg(short, long, default_value = "analysis")]
        output_dir: PathBuf,

        /// Also log the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Log the most cost-effective flights without writing files
    Rank {
        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// ';'-delimited flight export
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of equal time-of-day slots
    #[arg(long)]
    slot_count: Option<usize>,

    /// Score penalty per minute of flight time
    #[arg(long, allow_negative_numbers = true)]
    per_minute_penalty: Option<i64>,

    /// Score penalty per connection
    #[arg(long, allow_negative_numbers = true)]
    per_stop_penalty: Option<i64>,

    /// Score bonus for direct flights
    #[arg(long, allow_negative_numbers = true)]
    direct_bonus: Option<i64>,

    /// How many ranked flights to keep
    #[arg(short = 'n', long)]
    top_n: Option<usize>,
}

impl AnalysisArgs {
    /// Flags override environment variables, which override the config file.
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let base = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        let mut config = base.with_env()?;

        if let Some(v) = self.slot_count {
            config.slot_count = v.max(1);
        }
        if let Some(v) = self.per_minute_penalty {
            config.weights.per_minute_penalty = v;
        }
        if let Some(v) = self.per_stop_penalty {
            config.weights.per_stop_penalty = v;
        }
        if let Some(v) = self.direct_bonus {
            config.weights.direct_bonus = v;
        }
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/flight_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("flight_rater.log"));

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
        Commands::Analyze {
            analysis,
            output_dir,
            json,
        } => {
            let config = analysis.resolve_config()?;
            let report = analyze(&analysis.input, &config)?;

            if report.is_empty() {
                info!(input = %analysis.input.display(), "Nothing to analyze");
                return Ok(());
            }

            write_outputs(&report, &output_dir)?;
            print_pretty(&report);
            if json {
                print_json(&report)?;
            }
        }
        Commands::Rank { analysis } => {
            let config = analysis.resolve_config()?;
            let report = analyze(&analysis.input, &config)?;

            for (rank, scored) in report.top.iter().enumerate() {
                let flight = &scored.flight;
                info!(
                    rank = rank + 1,
                    score = scored.score,
                    airline = flight.airline(),
                    departure = flight.departure_time(),
                    arrival = flight.arrival_time(),
                    price = flight.price(),
                    currency = flight.currency(),
                    duration_minutes = flight.duration_minutes(),
                    stops = flight.stops_count(),
                    "Ranked flight"
                );
            }
        }
    }

    Ok(())
}

/// Hands the report to the export writers.
#[tracing::instrument(skip_all, fields(output_dir = %output_dir.display()))]
fn write_outputs(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    write_rows(
        &output_dir.join("top_cost_effective.csv"),
        &FLIGHT_HEADERS,
        &top_flight_rows(&report.top),
    )?;
    write_rows(
        &output_dir.join("summary_stats.csv"),
        &SUMMARY_HEADERS,
        &summary_rows(&report.stats),
    )?;

    let labels = build_slot_labels(report.matrix.slot_count());
    let heatmap = HeatmapTable::new(&report.matrix, labels)?;
    write_heatmap(
        &output_dir.join("heatmap_price_by_airline_timeslot.csv"),
        &heatmap,
    )?;

    write_report_json(&output_dir.join("analysis.json"), report)?;

    info!(
        airlines = report.airlines.len(),
        top = report.top.len(),
        "Results written"
    );
    Ok(())
}
