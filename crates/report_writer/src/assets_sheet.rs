use chrono::Datelike;
use models::{AccountCode, RunParameters, ValuationResult};
use rust_xlsxwriter::{ExcelDateTime, Format, Formula, Worksheet, XlsxError};

use crate::styles::{column_letter, Styles};

pub const SHEET_NAME: &str = "Revaluation & Depreciation";

pub(crate) const HEADERS: [&str; 16] = [
    "Account Code",
    "Description",
    "Acquisition Date",
    "Depr. Rate",
    "Depr. Method",
    "Book Gross Value",
    "Book Accum. Depr.",
    "Book Net Value",
    "",
    "Reval. Rate",
    "Revalued Gross Value",
    "Revalued Accum. Depr.",
    "Revalued Net Value",
    "",
    "Annual Depreciation",
    "Period Depreciation",
];

const WIDTHS: [f64; 16] = [
    12.0, 20.0, 15.0, 12.0, 15.0, 18.0, 18.0, 18.0, 2.0, 12.0, 18.0, 18.0, 18.0, 2.0, 18.0, 18.0,
];

const SPACER_COLUMNS: [u16; 2] = [8, 13];

/// Columns summed on the totals row.
const TOTAL_COLUMNS: [u16; 8] = [5, 6, 7, 10, 11, 12, 14, 15];

const HEADER_ROW: u32 = 5;
const FIRST_DATA_ROW: u32 = HEADER_ROW + 1;

pub(crate) fn build(
    results: &[ValuationResult],
    params: &RunParameters,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let mut ws = Worksheet::new();
    ws.set_name(SHEET_NAME)?;

    ws.merge_range(0, 0, 0, 15, "REVALUATION AND DEPRECIATION SCHEDULE", &styles.title)?;
    ws.write_string_with_format(
        1,
        0,
        format!("Transaction Year: {}", params.transaction_year),
        &styles.info,
    )?;
    ws.write_string_with_format(2, 0, format!("Period: {}", params.period.label()), &styles.info)?;
    ws.write_string_with_format(
        3,
        0,
        format!("Revaluation Rate: {:.4}%", params.global_rate * 100.0),
        &styles.info,
    )?;

    for (col, header) in HEADERS.iter().enumerate() {
        ws.write_string_with_format(HEADER_ROW, col as u16, *header, &styles.header)?;
    }

    let mut row = FIRST_DATA_ROW;
    for result in results {
        write_result_row(&mut ws, row, result, styles)?;
        row += 1;
    }

    write_totals(&mut ws, row, results, styles)?;

    for (col, width) in WIDTHS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }

    Ok(ws)
}

fn write_result_row(
    ws: &mut Worksheet,
    row: u32,
    r: &ValuationResult,
    styles: &Styles,
) -> Result<(), XlsxError> {
    let asset = &r.asset;

    write_account(ws, row, 0, &asset.account_code, &styles.cell)?;
    ws.write_string_with_format(row, 1, &asset.description, &styles.cell)?;

    let date = asset.acquisition_date;
    match ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8) {
        Ok(dt) => {
            ws.write_datetime_with_format(row, 2, &dt, &styles.date)?;
        }
        Err(_) => {
            ws.write_string_with_format(row, 2, date.format("%d.%m.%Y").to_string(), &styles.cell)?;
        }
    }

    ws.write_number_with_format(row, 3, asset.depreciation_rate, &styles.percent)?;
    ws.write_string_with_format(row, 4, asset.depreciation_method.label(), &styles.cell)?;
    ws.write_number_with_format(row, 5, asset.book_gross_value, &styles.amount)?;
    ws.write_number_with_format(row, 6, asset.book_accumulated_depreciation, &styles.amount)?;
    ws.write_number_with_format(row, 7, asset.book_net_value, &styles.amount)?;

    ws.write_number_with_format(row, 9, r.revaluation_rate, &styles.revalued_percent)?;
    ws.write_number_with_format(row, 10, r.revalued_gross_value, &styles.revalued_amount)?;
    ws.write_number_with_format(
        row,
        11,
        r.revalued_accumulated_depreciation,
        &styles.revalued_amount,
    )?;
    ws.write_number_with_format(row, 12, r.revalued_net_value, &styles.revalued_amount)?;

    ws.write_number_with_format(row, 14, r.annual_depreciation, &styles.amount)?;
    ws.write_number_with_format(row, 15, r.period_depreciation, &styles.amount)?;

    for col in SPACER_COLUMNS {
        ws.write_blank(row, col, &styles.cell)?;
    }
    Ok(())
}

fn write_totals(
    ws: &mut Worksheet,
    row: u32,
    results: &[ValuationResult],
    styles: &Styles,
) -> Result<(), XlsxError> {
    for col in 0..HEADERS.len() as u16 {
        ws.write_blank(row, col, &styles.cell)?;
    }
    ws.write_string_with_format(row, 1, "TOTAL", &styles.total_label)?;

    // Excel rows are 1-based.
    let first = FIRST_DATA_ROW + 1;
    let last = row;
    for col in TOTAL_COLUMNS {
        let letter = column_letter(col);
        let total: f64 = results.iter().map(|r| column_value(r, col)).sum();
        let formula = Formula::new(format!("=SUM({letter}{first}:{letter}{last})"))
            .set_result(total.to_string());
        ws.write_formula_with_format(row, col, formula, &styles.total_amount)?;
    }
    Ok(())
}

fn column_value(r: &ValuationResult, col: u16) -> f64 {
    match col {
        5 => r.asset.book_gross_value,
        6 => r.asset.book_accumulated_depreciation,
        7 => r.asset.book_net_value,
        10 => r.revalued_gross_value,
        11 => r.revalued_accumulated_depreciation,
        12 => r.revalued_net_value,
        14 => r.annual_depreciation,
        15 => r.period_depreciation,
        _ => 0.0,
    }
}

/// Plain integer codes are written as numbers so the sheet sorts and sums like the input.
pub(crate) fn write_account(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    code: &AccountCode,
    format: &Format,
) -> Result<(), XlsxError> {
    match code.as_integer() {
        Some(n) => ws.write_number_with_format(row, col, n as f64, format)?,
        None => ws.write_string_with_format(row, col, code.as_str(), format)?,
    };
    Ok(())
}
