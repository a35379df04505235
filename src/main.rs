//! CLI entry point for the weekly COVID-19 case report.
//!
//! Fetches the Taiwan CDC weekly dataset, aggregates confirmed cases by week
//! and by county, and prints the report to stdout. Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use covid_weekly_report::SENTINEL_EXIT_CODE;
use covid_weekly_report::config::{DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT, ReportConfig};
use covid_weekly_report::output::{OutputFormat, render};
use covid_weekly_report::parser::ParsePolicy;
use covid_weekly_report::pipeline::build_report;
use covid_weekly_report::stats::SeedPolicy;
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_weekly_report")]
#[command(about = "Aggregate weekly confirmed COVID-19 cases by week and county", long_about = None)]
struct Cli {
    /// URL or local file path of the weekly dataset
    #[arg(
        long = "url",
        value_name = "URL_OR_FILE",
        env = "COVID_REPORT_URL",
        default_value = DEFAULT_SOURCE_URL
    )]
    source: String,

    /// Seconds to wait for the whole download before giving up
    #[arg(
        long,
        env = "COVID_REPORT_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Drop (and log) records that fail to decode instead of aborting
    #[arg(long, default_value_t = false)]
    skip_malformed: bool,

    /// Seed each week/county bucket with 1 on first sight, like the legacy report
    #[arg(long, default_value_t = false)]
    legacy_seeding: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Cli {
    fn into_config(self) -> ReportConfig {
        ReportConfig {
            source: self.source,
            timeout: Duration::from_secs(self.timeout_secs),
            parse_policy: if self.skip_malformed {
                ParsePolicy::SkipMalformed
            } else {
                ParsePolicy::Strict
            },
            seed_policy: if self.legacy_seeding {
                SeedPolicy::FirstSeedsOne
            } else {
                SeedPolicy::Sum
            },
            format: self.format,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();
    let config = Cli::parse().into_config();

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Report failed");
            println!("{e:#}");
            ExitCode::from(SENTINEL_EXIT_CODE)
        }
    }
}

async fn run(config: &ReportConfig) -> Result<()> {
    let report = build_report(config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&mut out, config.format, &report)?;
    Ok(())
}

/// Colored stderr logging, plus a JSON rolling log file when `LOG_FILE_PATH` is set.
fn init_tracing() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let path = Path::new(&log_file_path);
            let log_dir = path.parent().unwrap_or(Path::new("logs"));
            let log_file_name = path
                .file_name()
                .unwrap_or(OsStr::new("covid_weekly_report.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::try_from_env("RUST_LOG_JSON")
                        .unwrap_or_else(|_| EnvFilter::new("debug")),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
