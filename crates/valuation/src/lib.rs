pub mod depreciation;
pub mod revaluation;

use models::{AssetRecord, RunParameters, ValuationResult};

pub use depreciation::{annual_depreciation, period_depreciation, useful_life};
pub use revaluation::{revaluation_rate, revalue};

/// Runs the revaluation and depreciation calculators for one asset.
pub fn value_asset(asset: &AssetRecord, params: &RunParameters) -> ValuationResult {
    let rate = revaluation_rate(
        asset.acquisition_date,
        params.transaction_year,
        asset.book_net_value,
        params.global_rate,
    );

    let revalued_gross_value = revalue(asset.book_gross_value, rate);
    let revalued_accumulated_depreciation = revalue(asset.book_accumulated_depreciation, rate);
    let revalued_net_value = revalued_gross_value - revalued_accumulated_depreciation;

    let annual = annual_depreciation(
        revalued_gross_value,
        revalued_net_value,
        asset.depreciation_rate,
        &asset.depreciation_method,
        asset.book_net_value,
        asset.acquisition_date,
        params.transaction_year,
    );

    ValuationResult {
        asset: asset.clone(),
        revaluation_rate: rate,
        revalued_gross_value,
        revalued_accumulated_depreciation,
        revalued_net_value,
        annual_depreciation: annual,
        period_depreciation: period_depreciation(annual, params.period),
    }
}

/// Values a whole batch, preserving input order.
pub fn value_assets(assets: &[AssetRecord], params: &RunParameters) -> Vec<ValuationResult> {
    let results: Vec<ValuationResult> = assets.iter().map(|a| value_asset(a, params)).collect();
    tracing::debug!(
        count = results.len(),
        year = params.transaction_year,
        period = params.period.code(),
        "valued assets"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{AccountCode, DepreciationMethod, Period};

    fn asset(
        code: &str,
        acquired: (i32, u32, u32),
        rate: f64,
        method: DepreciationMethod,
        gross: f64,
        accumulated: f64,
    ) -> AssetRecord {
        AssetRecord {
            account_code: AccountCode::new(code),
            description: "test asset".to_string(),
            acquisition_date: NaiveDate::from_ymd_opt(acquired.0, acquired.1, acquired.2).unwrap(),
            depreciation_rate: rate,
            depreciation_method: method,
            book_gross_value: gross,
            book_accumulated_depreciation: accumulated,
            book_net_value: gross - accumulated,
        }
    }

    fn params(year: i32, period: Period, rate: f64) -> RunParameters {
        RunParameters {
            transaction_year: year,
            period,
            global_rate: rate,
        }
    }

    #[test]
    fn test_same_year_linear_asset() {
        let a = asset("254", (2024, 1, 1), 0.20, DepreciationMethod::Normal, 3_000_000.0, 600_000.0);
        let r = value_asset(&a, &params(2024, Period::Annual, 0.15));

        assert_eq!(r.revaluation_rate, 0.0);
        assert_eq!(r.revalued_gross_value, 3_000_000.0);
        assert_eq!(r.revalued_accumulated_depreciation, 600_000.0);
        assert_eq!(r.revalued_net_value, 2_400_000.0);
        assert_eq!(r.annual_depreciation, 600_000.0);
        assert_eq!(r.period_depreciation, 600_000.0);
    }

    #[test]
    fn test_prior_year_accelerated_asset() {
        let a = asset("255", (2023, 12, 1), 0.10, DepreciationMethod::Accelerated, 1_000_000.0, 190_000.0);
        let r = value_asset(&a, &params(2024, Period::Annual, 0.15));

        assert_eq!(r.revaluation_rate, 0.15);
        assert!((r.revalued_gross_value - 1_150_000.0).abs() < 1e-6);
        assert!((r.revalued_accumulated_depreciation - 218_500.0).abs() < 1e-6);
        assert!((r.revalued_net_value - 931_500.0).abs() < 1e-6);
        assert!((r.annual_depreciation - 186_300.0).abs() < 1e-6);
    }

    #[test]
    fn test_fully_depreciated_asset() {
        let a = asset("253", (2020, 10, 1), 0.20, DepreciationMethod::Normal, 5_000_000.0, 5_000_000.0);
        let r = value_asset(&a, &params(2024, Period::HalfYear, 0.15));

        assert_eq!(r.revaluation_rate, 0.0);
        assert_eq!(r.revalued_net_value, 0.0);
        assert_eq!(r.annual_depreciation, 0.0);
        assert_eq!(r.period_depreciation, 0.0);
    }

    #[test]
    fn test_period_is_applied_to_annual_amount() {
        let a = asset("254", (2022, 5, 1), 0.25, DepreciationMethod::Normal, 400.0, 100.0);
        let r = value_asset(&a, &params(2024, Period::FirstQuarter, 0.0));
        assert_eq!(r.annual_depreciation, 100.0);
        assert_eq!(r.period_depreciation, 25.0);
    }

    #[test]
    fn test_valuation_is_deterministic() {
        let assets = vec![
            asset("254", (2024, 1, 1), 0.20, DepreciationMethod::Normal, 3_000_000.0, 600_000.0),
            asset("255", (2023, 12, 1), 0.10, DepreciationMethod::Accelerated, 1_000_000.0, 190_000.0),
        ];
        let p = params(2024, Period::NineMonths, 0.1550);
        assert_eq!(value_assets(&assets, &p), value_assets(&assets, &p));
    }
}
