//! JSON decoder for the weekly confirmed-case dataset.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ParseError;

/// One row of the weekly age/county/gender dataset.
///
/// Every value in the source is a JSON string; `week` and `confirmed_count`
/// carry digits and are decoded into integers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(rename = "診斷年份", default)]
    pub year: String,
    #[serde(rename = "診斷週別", deserialize_with = "from_numeric_str")]
    pub week: u32,
    #[serde(rename = "縣市")]
    pub county: String,
    #[serde(rename = "性別", default)]
    pub gender: String,
    #[serde(rename = "是否為境外移入", default)]
    pub foreign_imported: String,
    #[serde(rename = "年齡層", default)]
    pub age_group: String,
    #[serde(rename = "確定病例數", deserialize_with = "from_numeric_str")]
    pub confirmed_count: u32,
}

impl Record {
    /// Builds a record with only the fields the aggregation reads.
    pub fn new(week: u32, county: &str, confirmed_count: u32) -> Self {
        Record {
            year: String::new(),
            week,
            county: county.to_string(),
            gender: String::new(),
            foreign_imported: String::new(),
            age_group: String::new(),
            confirmed_count,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} week {}, county: {}, foreign: {}",
            self.year, self.week, self.county, self.foreign_imported
        )
    }
}

fn from_numeric_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(|e| {
        serde::de::Error::custom(format!("invalid numeric string {s:?}: {e}"))
    })
}

/// What to do with array elements that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Any malformed element fails the whole decode.
    #[default]
    Strict,
    /// Malformed elements are logged and dropped.
    SkipMalformed,
}

#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<Record>,
    /// Elements dropped under [`ParsePolicy::SkipMalformed`].
    pub skipped: usize,
}

/// Decodes a JSON array of records.
///
/// # Errors
///
/// Returns [`ParseError::Body`] if the bytes are not a JSON array, and
/// [`ParseError::Record`] for the first bad element under
/// [`ParsePolicy::Strict`].
pub fn parse_records(bytes: &[u8], policy: ParsePolicy) -> Result<Decoded, ParseError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;

    let mut decoded = Decoded {
        records: Vec::with_capacity(values.len()),
        skipped: 0,
    };

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Record>(value) {
            Ok(record) => decoded.records.push(record),
            Err(source) => match policy {
                ParsePolicy::Strict => return Err(ParseError::Record { index, source }),
                ParsePolicy::SkipMalformed => {
                    warn!(index, error = %source, "Skipping malformed record");
                    decoded.skipped += 1;
                }
            },
        }
    }

    if decoded.skipped > 0 {
        warn!(
            skipped = decoded.skipped,
            kept = decoded.records.len(),
            "Dropped malformed records"
        );
    }

    Ok(decoded)
}
