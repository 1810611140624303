use chrono::{Datelike, Days, NaiveDate};

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Expresses `part` as a percentage of `whole`.
///
/// Returns 0.0 when `whole` is not positive, so no payload can surface
/// NaN or an infinity through a division.
pub fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Returns the Monday starting the ISO week that contains `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[100.0, 300.0]), 200.0);
        assert_eq!(mean(&[5.0]), 5.0);
    }

    #[test]
    fn test_pct_guards_non_positive_whole() {
        assert_eq!(pct(10.0, 0.0), 0.0);
        assert_eq!(pct(10.0, -5.0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50.0, 100.0), 50.0);
        assert_eq!(pct(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_week_start_monday_is_identity() {
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_week_start_sunday_maps_back() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(
            week_start(sunday),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2024-03-01 was a Friday; its week starts in February
        let friday = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            week_start(friday),
            NaiveDate::from_ymd_opt(2024, 2, 26).unwrap()
        );
    }
}
