//! CLI entry point for the AIH analytics engine.
//!
//! Provides subcommands for each analytical view, a combined report,
//! and a concurrent batch mode over a directory of payload files.

use aih_analytics::analytics::ranking::compute_ranking;
use aih_analytics::analytics::series::compute_series;
use aih_analytics::analytics::share::compute_share;
use aih_analytics::analytics::types::AnalyticsReport;
use aih_analytics::auth;
use aih_analytics::output::{is_csv, print_json, write_csv, write_json};
use aih_analytics::records::{Payload, parse_discharge_date};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aih_analytics")]
#[command(about = "Computes analytical views over physician billing records", long_about = None)]
struct Cli {
    /// Pre-shared token identifying the caller
    #[arg(short, long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank physicians by average billed value
    Ranking {
        /// Path to a JSON payload ({filters, rows})
        #[arg(value_name = "PAYLOAD")]
        payload: String,

        /// Override the payload's topN limit
        #[arg(long)]
        top_n: Option<i64>,

        /// File to write results to (.json or .csv); stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute the weekly billing trend per physician
    Series {
        /// Path to a JSON payload ({filters, rows})
        #[arg(value_name = "PAYLOAD")]
        payload: String,

        /// File to write JSON results to; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Break down each physician's share of the total billed value
    Share {
        /// Path to a JSON payload ({filters, rows})
        #[arg(value_name = "PAYLOAD")]
        payload: String,

        /// File to write results to (.json or .csv); stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute all three views as a single report
    Report {
        /// Path to a JSON payload ({filters, rows})
        #[arg(value_name = "PAYLOAD")]
        payload: String,

        /// File to write JSON results to; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Process every payload in a directory concurrently
    Batch {
        /// Directory containing *.json payload files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: String,

        /// Directory to write one report per payload to
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Maximum number of payloads processed at once
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aih_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aih_analytics.log"));

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

    // The boundary gate runs before any payload is even read.
    let expected =
        std::env::var(auth::TOKEN_ENV).unwrap_or_else(|_| auth::DEV_TOKEN.to_string());
    auth::guard(cli.token.as_deref(), &expected)?;

    match cli.command {
        Commands::Ranking {
            payload,
            top_n,
            output,
        } => {
            let payload = load_payload(&payload)?;
            let mut filters = payload.filters.clone();
            if top_n.is_some() {
                filters.top_n = top_n;
            }
            let limit = filters.effective_top_n();

            let ranking = compute_ranking(&payload.rows, limit);
            info!(
                rows = payload.rows.len(),
                entries = ranking.len(),
                limit,
                "Ranking computed"
            );
            emit_table(&ranking, output.as_deref())?;
        }
        Commands::Series { payload, output } => {
            let payload = load_payload(&payload)?;
            warn_undated(&payload);

            let view = compute_series(&payload.rows);
            info!(
                rows = payload.rows.len(),
                bins = view.bins.len(),
                doctors = view.series.len(),
                "Series computed"
            );
            emit_value(&view, output.as_deref())?;
        }
        Commands::Share { payload, output } => {
            let payload = load_payload(&payload)?;

            let share = compute_share(&payload.rows);
            info!(
                rows = payload.rows.len(),
                entries = share.len(),
                "Share computed"
            );
            emit_table(&share, output.as_deref())?;
        }
        Commands::Report { payload, output } => {
            let payload = load_payload(&payload)?;
            warn_undated(&payload);

            let report = build_report(&payload);
            info!(
                rows = payload.rows.len(),
                ranking = report.ranking.len(),
                bins = report.series.bins.len(),
                share = report.share.len(),
                "Report computed"
            );
            emit_value(&report, output.as_deref())?;
        }
        Commands::Batch {
            input_dir,
            output_dir,
            concurrency,
        } => {
            run_batch(&input_dir, &output_dir, concurrency).await?;
        }
    }

    Ok(())
}

/// Loads and deserializes a payload file.
fn load_payload(path: &str) -> Result<Payload> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload '{path}'"))?;
    let payload: Payload = serde_json::from_str(&body)
        .with_context(|| format!("Payload '{path}' is not a valid {{filters, rows}} document"))?;
    Ok(payload)
}

/// Logs how many records will be excluded from the weekly series.
fn warn_undated(payload: &Payload) {
    let undated = payload
        .rows
        .iter()
        .filter(|r| parse_discharge_date(&r.discharge_date).is_none())
        .count();
    if undated > 0 {
        warn!(
            undated,
            "Records without a parseable discharge date are excluded from the weekly series"
        );
    }
}

/// Computes all three views over one payload.
fn build_report(payload: &Payload) -> AnalyticsReport {
    AnalyticsReport {
        generated_at: Utc::now(),
        ranking: compute_ranking(&payload.rows, payload.filters.effective_top_n()),
        series: compute_series(&payload.rows),
        share: compute_share(&payload.rows),
    }
}

/// Emits a flat view: CSV or JSON file when a path is given, pretty
/// JSON on stdout otherwise.
fn emit_table<T: Serialize>(rows: &[T], output: Option<&str>) -> Result<()> {
    match output {
        Some(path) if is_csv(path) => write_csv(path, rows),
        Some(path) => write_json(path, &rows),
        None => print_json(&rows),
    }
}

/// Emits a nested view: JSON file when a path is given, stdout otherwise.
fn emit_value(value: &impl Serialize, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => write_json(path, value),
        None => print_json(value),
    }
}

/// Processes every `*.json` payload under `input_dir` concurrently,
/// writing one report per payload and continuing past per-file failures.
#[tracing::instrument(fields(input_dir, output_dir, concurrency))]
async fn run_batch(input_dir: &str, output_dir: &str, concurrency: usize) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let mut payload_paths = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            payload_paths.push(path);
        }
    }
    payload_paths.sort();

    info!(payloads = payload_paths.len(), concurrency, "Starting batch run");

    let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(concurrency));
    let mut tasks = vec![];

    for path in payload_paths {
        let sem = semaphore.clone();
        let output_dir = output_dir.to_string();

        let payload_span = tracing::info_span!("process_payload", payload = %path.display());

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await.unwrap();

                let stem = path
                    .file_stem()
                    .and_then(OsStr::to_str)
                    .unwrap_or("payload")
                    .to_string();

                let payload = match load_payload(&path.to_string_lossy()) {
                    Ok(p) => p,
                    Err(e) => {
                        error!(error = %e, "Skipping unreadable payload");
                        return;
                    }
                };

                let report = build_report(&payload);
                let report_path = format!("{}/{}.report.json", output_dir, stem);

                if let Err(e) = write_json(&report_path, &report) {
                    error!(error = %e, "Failed to write report");
                } else {
                    info!(
                        rows = payload.rows.len(),
                        report = %report_path,
                        "Payload processed successfully"
                    );
                }
            }
            .instrument(payload_span),
        );

        tasks.push(task);
    }

    // Wait for all tasks to complete
    for task in tasks {
        let _ = task.await;
    }

    info!(output_dir, "Batch run complete");
    Ok(())
}
