//! Rendering of aggregated case counts.
//!
//! The text layout is the classic report; JSON and CSV carry the same data
//! for machine consumers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::stats::CaseStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
pub struct WeekCount {
    pub week: u32,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct CountyCount {
    pub county: String,
    pub count: u64,
}

/// Everything a rendered report needs, with breakdowns already ordered.
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub skipped_records: usize,
    pub total: u64,
    pub by_week: Vec<WeekCount>,
    pub by_county: Vec<CountyCount>,
}

impl Report {
    pub fn new(source: &str, stats: &CaseStats, skipped_records: usize) -> Self {
        Report {
            generated_at: Utc::now(),
            source: source.to_string(),
            skipped_records,
            total: stats.total,
            by_week: stats
                .by_week
                .iter()
                .map(|(&week, &count)| WeekCount { week, count })
                .collect(),
            by_county: stats
                .by_county
                .iter()
                .map(|(county, &count)| CountyCount {
                    county: county.clone(),
                    count,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    dimension: &'a str,
    key: String,
    count: u64,
}

/// Writes `report` to `w` in the requested format.
pub fn render<W: Write>(w: &mut W, format: OutputFormat, report: &Report) -> Result<()> {
    debug!(
        ?format,
        weeks = report.by_week.len(),
        counties = report.by_county.len(),
        "Rendering report"
    );
    match format {
        OutputFormat::Text => write_text(w, report)?,
        OutputFormat::Json => write_json(w, report)?,
        OutputFormat::Csv => write_csv(w, report)?,
    }
    Ok(())
}

/// Weeks ascend numerically; counties follow lexicographic order.
pub fn write_text<W: Write>(w: &mut W, report: &Report) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "aggregate by week")?;
    writeln!(w)?;
    for row in &report.by_week {
        writeln!(w, "week {}, count: {}", row.week, row.count)?;
    }

    writeln!(w, "aggregate by county")?;
    writeln!(w)?;
    for row in &report.by_county {
        writeln!(w, "county {}, count: {}", row.county, row.count)?;
    }

    writeln!(w)?;
    writeln!(w, "total:  {}", report.total)?;
    w.flush()
}

pub fn write_json<W: Write>(w: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

/// One `dimension,key,count` row per bucket, then a `total` row.
pub fn write_csv<W: Write>(w: &mut W, report: &Report) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(w);

    for row in &report.by_week {
        writer.serialize(CsvRow {
            dimension: "week",
            key: row.week.to_string(),
            count: row.count,
        })?;
    }
    for row in &report.by_county {
        writer.serialize(CsvRow {
            dimension: "county",
            key: row.county.clone(),
            count: row.count,
        })?;
    }
    writer.serialize(CsvRow {
        dimension: "total",
        key: String::new(),
        count: report.total,
    })?;

    writer.flush()?;
    Ok(())
}
