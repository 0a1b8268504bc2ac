use rust_xlsxwriter::{ExcelDateTime, Formula, Workbook, Worksheet, XlsxError};

use crate::styles::Styles;

pub const SHEET_NAME: &str = "Template";
pub const TEMPLATE_FILE_NAME: &str = "FIXED_ASSET_REGISTER_TEMPLATE.xlsx";

/// Input columns, in the order the asset reader expects them.
pub const INPUT_HEADERS: [&str; 8] = [
    "Account Code",
    "Description",
    "Acquisition Date",
    "Depreciation Rate",
    "Depreciation Method",
    "Book Gross Value",
    "Book Accumulated Depreciation",
    "Book Net Value",
];

const WIDTHS: [f64; 8] = [14.0, 25.0, 18.0, 16.0, 18.0, 18.0, 20.0, 18.0];

struct Example {
    account: f64,
    description: &'static str,
    date: (u16, u8, u8),
    rate: f64,
    method: &'static str,
    gross: f64,
    accumulated: f64,
}

// Both methods, a zero-accumulated-depreciation asset and a fully depreciated one.
const EXAMPLES: [Example; 4] = [
    Example {
        account: 254.0,
        description: "BMW Car",
        date: (2024, 1, 1),
        rate: 0.20,
        method: "Normal",
        gross: 3_000_000.0,
        accumulated: 600_000.0,
    },
    Example {
        account: 254.0,
        description: "Mercedes Car",
        date: (2025, 1, 1),
        rate: 0.20,
        method: "Normal",
        gross: 2_000_000.0,
        accumulated: 0.0,
    },
    Example {
        account: 255.0,
        description: "Typewriter",
        date: (2023, 12, 1),
        rate: 0.10,
        method: "Accelerated",
        gross: 1_000_000.0,
        accumulated: 190_000.0,
    },
    Example {
        account: 253.0,
        description: "Machine",
        date: (2020, 10, 1),
        rate: 0.20,
        method: "Normal",
        gross: 5_000_000.0,
        accumulated: 5_000_000.0,
    },
];

pub(crate) fn build_workbook(styles: &Styles) -> Result<Workbook, XlsxError> {
    let mut ws = Worksheet::new();
    ws.set_name(SHEET_NAME)?;

    for (col, header) in INPUT_HEADERS.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *header, &styles.header)?;
    }

    for (idx, example) in EXAMPLES.iter().enumerate() {
        let row = idx as u32 + 1;
        let excel_row = row + 1;
        let (y, m, d) = example.date;

        ws.write_number_with_format(row, 0, example.account, &styles.example)?;
        ws.write_string_with_format(row, 1, example.description, &styles.example)?;
        ws.write_datetime_with_format(row, 2, &ExcelDateTime::from_ymd(y, m, d)?, &styles.example_date)?;
        ws.write_number_with_format(row, 3, example.rate, &styles.example_rate)?;
        ws.write_string_with_format(row, 4, example.method, &styles.example)?;
        ws.write_number_with_format(row, 5, example.gross, &styles.example_amount)?;
        ws.write_number_with_format(row, 6, example.accumulated, &styles.example_amount)?;

        // Cached result lets readers without a formula engine see the net value.
        let net = Formula::new(format!("=F{excel_row}-G{excel_row}"))
            .set_result((example.gross - example.accumulated).to_string());
        ws.write_formula_with_format(row, 7, net, &styles.example_amount)?;
    }

    for (col, width) in WIDTHS.iter().enumerate() {
        ws.set_column_width(col as u16, *width)?;
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(ws);
    Ok(workbook)
}
