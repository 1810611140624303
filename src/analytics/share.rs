use std::collections::BTreeMap;

use crate::analytics::types::ShareEntry;
use crate::analytics::utility::pct;
use crate::records::BillingRecord;

/// Computes each physician's share of the total billed value.
///
/// Groups are collected in ascending name order and stable-sorted
/// descending by total, mirroring the ranking view's tie behavior.
/// When the grand total is not positive every percentage is 0.0.
pub fn compute_share(records: &[BillingRecord]) -> Vec<ShareEntry> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.doctor_name.as_str()).or_default() += record.aih_value;
    }

    let grand_total: f64 = totals.values().sum();

    let mut entries: Vec<ShareEntry> = totals
        .into_iter()
        .map(|(doctor, value)| ShareEntry {
            doctor: doctor.to_string(),
            value,
            pct: pct(value, grand_total),
        })
        .collect();

    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}
