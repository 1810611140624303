//! Data types produced by the aggregation engine.
//!
//! Field names match the response body of the reporting front end:
//! ranking entries `{doctor, avg}`, series rows `{doctor, values}`,
//! share entries `{doctor, value, pct}`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the top-performer ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub doctor: String,
    pub avg: f64,
}

/// Weekly values for one physician, aligned to the global bin set.
///
/// `values` always has one entry per bin; `None` marks weeks where the
/// physician has no qualifying records and serializes as JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesRow {
    pub doctor: String,
    pub values: Vec<Option<f64>>,
}

/// Weekly trend view: the global bin set plus one aligned row per
/// physician. Bins name the Monday starting each ISO week, `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesView {
    pub bins: Vec<String>,
    pub series: Vec<SeriesRow>,
}

/// One row of the share-of-total breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ShareEntry {
    pub doctor: String,
    pub value: f64,
    pub pct: f64,
}

/// All three views computed over one payload, as written by the CLI.
#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub ranking: Vec<RankingEntry>,
    pub series: SeriesView,
    pub share: Vec<ShareEntry>,
}
