//! Fetch, decode and aggregate in one pass.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::fetch::{BasicClient, HttpClient, fetch_source};
use crate::output::Report;
use crate::parser::parse_records;
use crate::stats::CaseStats;

/// Runs the pipeline with a client built from `config.timeout`.
pub async fn build_report(config: &ReportConfig) -> Result<Report> {
    let client = BasicClient::with_timeout(config.timeout).context("building HTTP client")?;
    build_report_with(&client, config).await
}

/// Runs the pipeline over an injected transport.
#[tracing::instrument(skip_all, fields(source = %config.source))]
pub async fn build_report_with<C: HttpClient>(client: &C, config: &ReportConfig) -> Result<Report> {
    let bytes = fetch_source(client, &config.source)
        .await
        .with_context(|| format!("loading dataset from {}", config.source))?;
    info!(bytes = bytes.len(), "Dataset fetched");

    let decoded = parse_records(&bytes, config.parse_policy)?;
    info!(
        records = decoded.records.len(),
        skipped = decoded.skipped,
        "Dataset decoded"
    );

    let stats = CaseStats::from_records(&decoded.records, config.seed_policy);
    if !stats.is_consistent() {
        warn!(
            total = stats.total,
            week_total = stats.week_total(),
            county_total = stats.county_total(),
            seed_policy = ?config.seed_policy,
            "Breakdowns do not add up to the total"
        );
    }
    info!(
        weeks = stats.by_week.len(),
        counties = stats.by_county.len(),
        total = stats.total,
        "Aggregation complete"
    );

    Ok(Report::new(&config.source, &stats, decoded.skipped))
}
