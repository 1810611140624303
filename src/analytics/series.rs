use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analytics::types::{SeriesRow, SeriesView};
use crate::analytics::utility::{mean, week_start};
use crate::records::{BillingRecord, parse_discharge_date};

/// Computes the weekly billing trend per physician.
///
/// Averaging runs in two stages: records first collapse to one mean per
/// physician per calendar day, then the daily means collapse to one
/// mean per physician per ISO week. A day with many records therefore
/// weighs the same as a day with one; this is not a weekly mean of the
/// raw values.
///
/// Bins are the union of the active weeks of every physician, ascending;
/// gap weeks between them are not synthesized. Each row carries exactly
/// one value slot per bin, `None` where that physician has no data.
pub fn compute_series(records: &[BillingRecord]) -> SeriesView {
    // Daily stage: (doctor, day) -> raw values.
    let mut daily: BTreeMap<(&str, NaiveDate), Vec<f64>> = BTreeMap::new();
    for record in records {
        let Some(day) = parse_discharge_date(&record.discharge_date) else {
            // Undated records feed the ranking and share views only.
            continue;
        };
        daily
            .entry((record.doctor_name.as_str(), day))
            .or_default()
            .push(record.aih_value);
    }

    // Weekly stage: (doctor, week start) -> daily means.
    let mut weekly: BTreeMap<(&str, NaiveDate), Vec<f64>> = BTreeMap::new();
    for ((doctor, day), values) in daily {
        weekly
            .entry((doctor, week_start(day)))
            .or_default()
            .push(mean(&values));
    }

    let mut bins: Vec<NaiveDate> = weekly.keys().map(|&(_, week)| week).collect();
    bins.sort();
    bins.dedup();

    let mut by_doctor: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for ((doctor, week), day_means) in weekly {
        by_doctor
            .entry(doctor)
            .or_default()
            .insert(week, mean(&day_means));
    }

    let series = by_doctor
        .into_iter()
        .map(|(doctor, weeks)| SeriesRow {
            doctor: doctor.to_string(),
            values: bins.iter().map(|bin| weeks.get(bin).copied()).collect(),
        })
        .collect();

    SeriesView {
        bins: bins
            .iter()
            .map(|bin| bin.format("%Y-%m-%d").to_string())
            .collect(),
        series,
    }
}
