//! Renders valuation results and journal vouchers into an `.xlsx` workbook,
//! and produces the blank input template.
//!
//! Workbooks are rendered into memory. Callers decide where the bytes go,
//! so a failed render never leaves a partial file behind.

mod assets_sheet;
mod styles;
mod template;
mod vouchers_sheet;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use journal::ChartOfAccounts;
use models::{RunParameters, ValuationResult, VoucherSet};
use rust_xlsxwriter::Workbook;
use sha2::{Digest, Sha256};

use crate::styles::Styles;

pub use assets_sheet::SHEET_NAME as ASSET_SHEET_NAME;
pub use template::{INPUT_HEADERS, TEMPLATE_FILE_NAME};
pub use vouchers_sheet::SHEET_NAME as VOUCHER_SHEET_NAME;

/// Renders the two-sheet output workbook.
pub fn render_report(
    results: &[ValuationResult],
    vouchers: &VoucherSet,
    params: &RunParameters,
    chart: &ChartOfAccounts,
) -> Result<Vec<u8>> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(
        assets_sheet::build(results, params, &styles).context("Rendering asset detail sheet")?,
    );
    workbook.push_worksheet(
        vouchers_sheet::build(vouchers, chart, &styles).context("Rendering journal voucher sheet")?,
    );

    let bytes = workbook
        .save_to_buffer()
        .context("Serializing report workbook")?;
    tracing::debug!(bytes = bytes.len(), assets = results.len(), "rendered report");
    Ok(bytes)
}

/// Renders the blank input template with its example rows.
pub fn render_template() -> Result<Vec<u8>> {
    let styles = Styles::new();
    let mut workbook = template::build_workbook(&styles).context("Rendering input template")?;
    workbook
        .save_to_buffer()
        .context("Serializing input template")
}

/// Output file name for a rendered report. The short content hash keeps
/// names unique when two runs finish within the same second.
pub fn report_file_name(params: &RunParameters, generated_at: NaiveDateTime, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = hasher.finalize();

    format!(
        "Revaluation_Depreciation_{}_{}_{}_{}.xlsx",
        params.transaction_year,
        params.period.label().replace(' ', "_").replace('.', ""),
        generated_at.format("%Y%m%d_%H%M%S"),
        hex::encode(&hash[..6])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use models::{AccountCode, AssetRecord, DepreciationMethod, JournalLine, JournalVoucher, Period};
    use std::io::Cursor;

    fn params() -> RunParameters {
        RunParameters {
            transaction_year: 2024,
            period: Period::Annual,
            global_rate: 0.15,
        }
    }

    fn sample_result() -> ValuationResult {
        ValuationResult {
            asset: AssetRecord {
                account_code: AccountCode::new("255"),
                description: "Typewriter".to_string(),
                acquisition_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                depreciation_rate: 0.10,
                depreciation_method: DepreciationMethod::Accelerated,
                book_gross_value: 1_000_000.0,
                book_accumulated_depreciation: 190_000.0,
                book_net_value: 810_000.0,
            },
            revaluation_rate: 0.15,
            revalued_gross_value: 1_150_000.0,
            revalued_accumulated_depreciation: 218_500.0,
            revalued_net_value: 931_500.0,
            annual_depreciation: 186_300.0,
            period_depreciation: 186_300.0,
        }
    }

    fn sample_vouchers() -> VoucherSet {
        VoucherSet {
            revaluation: vec![JournalVoucher {
                description: "Revaluation - 255".to_string(),
                source_account: AccountCode::new("255"),
                lines: vec![
                    JournalLine::debit(AccountCode::new("255"), 150_000.0),
                    JournalLine::credit(AccountCode::new("257"), 28_500.0),
                    JournalLine::credit(AccountCode::new("522"), 121_500.0),
                ],
            }],
            depreciation: vec![JournalVoucher {
                description: "Period Depreciation - 255".to_string(),
                source_account: AccountCode::new("255"),
                lines: vec![
                    JournalLine::debit(AccountCode::new("770"), 186_300.0),
                    JournalLine::credit(AccountCode::new("257"), 186_300.0),
                ],
            }],
        }
    }

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        Xlsx::new(Cursor::new(bytes)).unwrap()
    }

    fn text(cell: Option<&Data>) -> String {
        match cell {
            Some(Data::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Formula cells carry their cached result either as a number or as text.
    fn cached_number(cell: Option<&Data>) -> f64 {
        match cell {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            Some(Data::String(s)) => s.parse().unwrap(),
            other => panic!("no cached number in {:?}", other),
        }
    }

    #[test]
    fn test_report_has_both_sheets() {
        let bytes = render_report(
            &[sample_result()],
            &sample_vouchers(),
            &params(),
            &ChartOfAccounts::default(),
        )
        .unwrap();
        let workbook = open(bytes);
        assert_eq!(
            workbook.sheet_names(),
            vec![ASSET_SHEET_NAME.to_string(), VOUCHER_SHEET_NAME.to_string()]
        );
    }

    #[test]
    fn test_asset_sheet_layout() {
        let bytes = render_report(
            &[sample_result()],
            &sample_vouchers(),
            &params(),
            &ChartOfAccounts::default(),
        )
        .unwrap();
        let mut workbook = open(bytes);
        let range = workbook.worksheet_range(ASSET_SHEET_NAME).unwrap();

        assert_eq!(text(range.get_value((1, 0))), "Transaction Year: 2024");
        assert_eq!(text(range.get_value((2, 0))), "Period: Annual");
        assert_eq!(text(range.get_value((3, 0))), "Revaluation Rate: 15.0000%");
        assert_eq!(text(range.get_value((5, 10))), "Revalued Gross Value");

        assert_eq!(range.get_value((6, 0)), Some(&Data::Float(255.0)));
        assert_eq!(range.get_value((6, 10)), Some(&Data::Float(1_150_000.0)));
        assert_eq!(range.get_value((6, 15)), Some(&Data::Float(186_300.0)));

        // totals row carries cached sums
        assert_eq!(text(range.get_value((7, 1))), "TOTAL");
        assert_eq!(cached_number(range.get_value((7, 5))), 1_000_000.0);
    }

    #[test]
    fn test_voucher_sheet_leaves_unused_side_blank() {
        let bytes = render_report(
            &[sample_result()],
            &sample_vouchers(),
            &params(),
            &ChartOfAccounts::default(),
        )
        .unwrap();
        let mut workbook = open(bytes);
        let range = workbook.worksheet_range(VOUCHER_SHEET_NAME).unwrap();

        assert_eq!(text(range.get_value((2, 0))), "REVALUATION VOUCHERS");
        assert_eq!(text(range.get_value((3, 0))), "Revaluation - 255");
        assert_eq!(text(range.get_value((4, 2))), "Debit");

        // debit line: 255 / Demirbaşlar / 150,000 / blank
        assert_eq!(range.get_value((5, 0)), Some(&Data::Float(255.0)));
        assert_eq!(text(range.get_value((5, 1))), "Demirbaşlar");
        assert_eq!(range.get_value((5, 2)), Some(&Data::Float(150_000.0)));
        assert!(matches!(range.get_value((5, 3)), None | Some(Data::Empty)));

        // credit line
        assert!(matches!(range.get_value((6, 2)), None | Some(Data::Empty)));
        assert_eq!(range.get_value((6, 3)), Some(&Data::Float(28_500.0)));

        // revaluation block: desc, header, 3 lines, spacer; then one blank row
        assert_eq!(text(range.get_value((10, 0))), "DEPRECIATION VOUCHERS");
        assert_eq!(text(range.get_value((11, 0))), "Period Depreciation - 255");
    }

    #[test]
    fn test_template_headers_and_examples() {
        let mut workbook = open(render_template().unwrap());
        let range = workbook.worksheet_range("Template").unwrap();

        for (col, header) in INPUT_HEADERS.iter().enumerate() {
            assert_eq!(text(range.get_value((0, col as u32))), *header);
        }
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(254.0)));
        assert_eq!(text(range.get_value((3, 4))), "Accelerated");
        assert_eq!(cached_number(range.get_value((1, 7))), 2_400_000.0);
        assert_eq!(cached_number(range.get_value((4, 7))), 0.0);
    }

    #[test]
    fn test_report_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap();
        let mut p = params();
        p.period = Period::HalfYear;
        let name = report_file_name(&p, at, b"workbook");
        assert!(name.starts_with("Revaluation_Depreciation_2024_Half_Year_20241231_235901_"));
        assert!(name.ends_with(".xlsx"));
        assert_ne!(name, report_file_name(&p, at, b"other workbook"));
    }
}
