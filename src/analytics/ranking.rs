use std::collections::BTreeMap;

use crate::analytics::types::RankingEntry;
use crate::records::BillingRecord;

#[derive(Default)]
struct GroupAcc {
    sum: f64,
    count: u32,
}

/// Computes the top `top_n` physicians by average billed value.
///
/// Records group by physician display name under exact, case-sensitive
/// equality. Groups are collected in ascending name order and then
/// stable-sorted descending by average, so physicians with equal
/// averages stay alphabetical.
pub fn compute_ranking(records: &[BillingRecord], top_n: usize) -> Vec<RankingEntry> {
    let mut groups: BTreeMap<&str, GroupAcc> = BTreeMap::new();

    for record in records {
        let acc = groups.entry(record.doctor_name.as_str()).or_default();
        acc.sum += record.aih_value;
        acc.count += 1;
    }

    let mut entries: Vec<RankingEntry> = groups
        .into_iter()
        .map(|(doctor, acc)| RankingEntry {
            doctor: doctor.to_string(),
            avg: if acc.count > 0 {
                acc.sum / f64::from(acc.count)
            } else {
                0.0
            },
        })
        .collect();

    entries.sort_by(|a, b| b.avg.total_cmp(&a.avg));
    entries.truncate(top_n);
    entries
}
