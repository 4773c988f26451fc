//! CLI entry point for the bus line checker.
//!
//! Reads a JSON array of stop records, folds them into per-line aggregates and
//! prints the selected report.

use anyhow::{Context, Result};
use bus_line_checker::formats::check_formats;
use bus_line_checker::output::{append_line_counts, write_json, write_text};
use bus_line_checker::parser::parse_records;
use bus_line_checker::{Ingestor, LineRegistry};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::fmt::Display;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bus_line_checker")]
#[command(about = "Validate a bus line dataset and report on it", long_about = None)]
struct Cli {
    /// JSON file to read records from ("-" or omitted reads standard input)
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Number of stops on each line
    LineNames {
        /// CSV file to append per-line counts to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Start, transfer and finish stops
    Lines,
    /// Lines whose arrival times go backwards
    ArrivalTime,
    /// On-demand stops that are also transfer points
    OnDemand,
    /// Field format errors across all records
    Formats,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    let bytes = read_input(cli.input.as_deref())?;
    let records = parse_records(&bytes).context("failed to parse input records")?;
    info!(records = records.len(), "Records loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::LineNames { csv } => {
            let summary = build_registry(records)?.line_summary();
            if let Some(path) = csv {
                append_line_counts(&path, &summary)?;
                info!(path = %path, "Line counts appended");
            }
            emit(&mut out, &summary, cli.json)?;
        }
        Commands::Lines => {
            emit(&mut out, &build_registry(records)?.topology(), cli.json)?;
        }
        Commands::ArrivalTime => {
            emit(&mut out, &build_registry(records)?.arrival_order(), cli.json)?;
        }
        Commands::OnDemand => {
            emit(
                &mut out,
                &build_registry(records)?.stop_role_conflicts(),
                cli.json,
            )?;
        }
        Commands::Formats => {
            emit(&mut out, &check_formats(&records), cli.json)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bus_line_checker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bus_line_checker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(guard)
}

/// Reads the whole payload from a file, or from stdin when no file is given.
#[tracing::instrument(fields(source = ?path))]
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read(p).with_context(|| format!("failed to read {}", p.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(bytes)
}

/// Ingests all records, aborting on the first fault.
fn build_registry(records: Vec<Value>) -> Result<LineRegistry> {
    let mut ingestor = Ingestor::new(records);
    if let Err(e) = ingestor.ingest() {
        error!(error = %e, "Ingestion aborted");
        return Err(e.into());
    }
    Ok(ingestor.into_registry())
}

fn emit<R: Display + Serialize>(out: &mut impl Write, report: &R, json: bool) -> Result<()> {
    if json {
        write_json(out, report)
    } else {
        write_text(out, report)
    }
}
