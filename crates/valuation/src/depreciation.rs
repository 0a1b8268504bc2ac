use chrono::{Datelike, NaiveDate};
use models::{DepreciationMethod, Period};

/// Useful life in whole years implied by a rate (0.20 -> 5).
/// Non-positive rates have no useful life.
pub fn useful_life(rate: f64) -> i64 {
    if rate > 0.0 {
        (1.0 / rate).floor() as i64
    } else {
        0
    }
}

/// Full-year depreciation of a revalued asset.
///
/// - Normal (and any unrecognised method): `revalued_gross * rate`.
/// - Accelerated: `revalued_net * rate * 2`, except from the last year of
///   the useful life onwards, where the whole remaining net value is written
///   off.
///
/// Nothing is depreciated once the book or revalued net value is 0.
pub fn annual_depreciation(
    revalued_gross: f64,
    revalued_net: f64,
    rate: f64,
    method: &DepreciationMethod,
    book_net_value: f64,
    acquisition_date: NaiveDate,
    transaction_year: i32,
) -> f64 {
    if book_net_value == 0.0 || revalued_net == 0.0 {
        return 0.0;
    }

    match method {
        DepreciationMethod::Accelerated => {
            let life = useful_life(rate);
            let elapsed = i64::from(transaction_year - acquisition_date.year());
            if life > 0 && elapsed >= life - 1 {
                revalued_net
            } else {
                revalued_net * (rate * 2.0)
            }
        }
        DepreciationMethod::Normal | DepreciationMethod::Other(_) => revalued_gross * rate,
    }
}

/// Share of a full-year amount attributable to the reporting period.
/// Each period stands on its own; values are not cumulative.
pub fn period_depreciation(annual: f64, period: Period) -> f64 {
    match period {
        Period::FirstQuarter => annual / 4.0,
        Period::HalfYear => annual / 2.0,
        Period::NineMonths => annual * 0.75,
        Period::Annual => annual,
    }
}
