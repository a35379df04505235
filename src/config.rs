use std::time::Duration;

use crate::output::OutputFormat;
use crate::parser::ParsePolicy;
use crate::stats::SeedPolicy;

/// Weekly confirmed cases by age, county and gender, published by Taiwan CDC.
pub const DEFAULT_SOURCE_URL: &str =
    "https://od.cdc.gov.tw/eic/Weekly_Age_County_Gender_19CoV.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// `http(s)` URL or local file path.
    pub source: String,
    pub timeout: Duration,
    pub parse_policy: ParsePolicy,
    pub seed_policy: SeedPolicy,
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            parse_policy: ParsePolicy::default(),
            seed_policy: SeedPolicy::default(),
            format: OutputFormat::default(),
        }
    }
}
