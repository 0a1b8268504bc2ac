use journal::ChartOfAccounts;
use models::{JournalVoucher, VoucherSet};
use rust_xlsxwriter::{Worksheet, XlsxError};

use crate::assets_sheet::write_account;
use crate::styles::Styles;

pub const SHEET_NAME: &str = "Journal Vouchers";

const LINE_HEADERS: [&str; 4] = ["Account Code", "Account Name", "Debit", "Credit"];
const WIDTHS: [f64; 4] = [15.0, 30.0, 18.0, 18.0];

pub(crate) fn build(
    vouchers: &VoucherSet,
    chart: &ChartOfAccounts,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let mut ws = Worksheet::new();
    ws.set_name(SHEET_NAME)?;

    ws.merge_range(0, 0, 0, 3, "JOURNAL VOUCHERS", &styles.title)?;

    let mut row = 2;
    row = write_section(&mut ws, row, "REVALUATION VOUCHERS", &vouchers.revaluation, chart, styles)?;
    row += 1;
    write_section(&mut ws, row, "DEPRECIATION VOUCHERS", &vouchers.depreciation, chart, styles)?;

    for (col, width) in WIDTHS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }

    Ok(ws)
}

/// Writes a banner and its vouchers starting at `row`; returns the next free row.
fn write_section(
    ws: &mut Worksheet,
    mut row: u32,
    banner: &str,
    vouchers: &[JournalVoucher],
    chart: &ChartOfAccounts,
    styles: &Styles,
) -> Result<u32, XlsxError> {
    ws.merge_range(row, 0, row, 3, banner, &styles.banner)?;
    row += 1;

    for voucher in vouchers {
        ws.write_string_with_format(row, 0, &voucher.description, &styles.bold)?;
        row += 1;

        for (col, header) in LINE_HEADERS.iter().enumerate() {
            ws.write_string_with_format(row, col as u16, *header, &styles.column_header)?;
        }
        row += 1;

        for line in &voucher.lines {
            write_account(ws, row, 0, &line.account, &styles.cell)?;
            ws.write_string_with_format(
                row,
                1,
                chart.account_name(&line.account).unwrap_or_default(),
                &styles.cell,
            )?;
            write_amount(ws, row, 2, line.debit, styles)?;
            write_amount(ws, row, 3, line.credit, styles)?;
            row += 1;
        }
        row += 1;
    }

    Ok(row)
}

/// The unused side of a line stays blank rather than showing 0.
fn write_amount(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    amount: f64,
    styles: &Styles,
) -> Result<(), XlsxError> {
    if amount > 0.0 {
        ws.write_number_with_format(row, col, amount, &styles.amount)?;
    } else {
        ws.write_blank(row, col, &styles.amount)?;
    }
    Ok(())
}
