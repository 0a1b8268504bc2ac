use chrono::{Datelike, NaiveDate};

/// Revaluation rate applied to a single asset.
///
/// Fully depreciated assets (net book value 0) and assets acquired in the
/// transaction year itself are not revalued. Every other asset gets the
/// global rate unchanged.
pub fn revaluation_rate(
    acquisition_date: NaiveDate,
    transaction_year: i32,
    book_net_value: f64,
    global_rate: f64,
) -> f64 {
    if book_net_value == 0.0 {
        return 0.0;
    }
    if acquisition_date.year() == transaction_year {
        return 0.0;
    }
    global_rate
}

/// Scales a book amount by `1 + rate`.
pub fn revalue(amount: f64, rate: f64) -> f64 {
    amount * (1.0 + rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_net_value_is_not_revalued() {
        assert_eq!(revaluation_rate(date(2020, 10, 1), 2024, 0.0, 0.15), 0.0);
    }

    #[test]
    fn test_same_year_acquisition_is_not_revalued() {
        assert_eq!(revaluation_rate(date(2024, 1, 1), 2024, 2_400_000.0, 0.15), 0.0);
        assert_eq!(revaluation_rate(date(2024, 12, 31), 2024, 1.0, 0.15), 0.0);
    }

    #[test]
    fn test_global_rate_applies_unchanged() {
        assert_eq!(revaluation_rate(date(2023, 12, 1), 2024, 810_000.0, 0.15), 0.15);
        assert_eq!(revaluation_rate(date(1999, 6, 1), 2024, 5.0, 0.3125), 0.3125);
    }

    #[test]
    fn test_revalue_scales_by_one_plus_rate() {
        assert!((revalue(1_000_000.0, 0.15) - 1_150_000.0).abs() < 1e-6);
        assert!((revalue(190_000.0, 0.15) - 218_500.0).abs() < 1e-6);
        assert_eq!(revalue(42.0, 0.0), 42.0);
    }
}
