//! Wire types for the analytics payload.
//!
//! The reporting front end already holds the raw billing records; it
//! submits them together with the filter descriptor it applied. The
//! types here mirror that request body exactly: snake_case record
//! fields, camelCase filter fields.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Ranking size used when `topN` is absent or non-positive.
pub const DEFAULT_TOP_N: usize = 6;

/// A single hospital billing/discharge record attributed to a physician.
///
/// `doctor_name` is the sole grouping key; the identifiers are carried
/// through untouched. `aih_value` accepts a JSON number or a numeric
/// string and degrades to 0.0 instead of failing the record.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingRecord {
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub doctor_cns: Option<String>,
    #[serde(default)]
    pub discharge_date: String,
    #[serde(default, deserialize_with = "lenient_value")]
    pub aih_value: f64,
}

/// Selection descriptor submitted alongside the records.
///
/// Only `top_n` feeds the engine. The remaining hints describe the
/// filtering the caller already applied and are not re-applied here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub hospitals: Option<Vec<String>>,
    pub specialty: Option<String>,
    pub care_character: Option<String>,
    pub top_n: Option<i64>,
}

impl Filters {
    /// Effective ranking size: absent, zero, and negative values all
    /// fall back to [`DEFAULT_TOP_N`].
    pub fn effective_top_n(&self) -> usize {
        match self.top_n {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_TOP_N,
        }
    }
}

/// Full request body: filter descriptor plus pre-filtered record list.
#[derive(Debug, Clone, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub rows: Vec<BillingRecord>,
}

fn lenient_value<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(de)?;
    Ok(coerce_value(&raw))
}

/// Coerces a JSON value into a finite monetary amount.
///
/// Numbers pass through, numeric strings are parsed; anything else
/// (including NaN and infinities) becomes 0.0 so one bad cell never
/// fails the whole payload.
pub fn coerce_value(raw: &serde_json::Value) -> f64 {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a discharge date.
///
/// Accepts plain ISO dates, slash-separated dates, and ISO datetimes
/// with or without an offset. Returns `None` otherwise: undated records
/// stay in the ranking and share views but are dropped from the weekly
/// series.
pub fn parse_discharge_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    None
}
