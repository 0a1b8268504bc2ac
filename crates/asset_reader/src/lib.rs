//! Reads a fixed-asset register into [`AssetRecord`]s.
//!
//! The register is a table with a header row and eight columns in a fixed
//! order: account code, description, acquisition date, depreciation rate,
//! depreciation method, gross value, accumulated depreciation and net value.
//!
//! Reading stops at the first data row whose account code cell is empty.
//! That row marks the end of the data; rows below it are never looked at.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use models::{AccountCode, AssetRecord, DepreciationMethod};
use std::path::Path;

pub const COLUMN_COUNT: usize = 8;

const COL_ACCOUNT: usize = 0;
const COL_DESCRIPTION: usize = 1;
const COL_DATE: usize = 2;
const COL_RATE: usize = 3;
const COL_METHOD: usize = 4;
const COL_GROSS: usize = 5;
const COL_ACCUMULATED: usize = 6;
const COL_NET: usize = 7;

/// Spreadsheet row number (1-based) of the first data row.
const FIRST_DATA_ROW: usize = 2;

/// Reads a register file, picking the format from the extension.
/// `.csv` goes through the CSV reader, everything else through calamine.
pub fn read_assets<P: AsRef<Path>>(path: P) -> Result<Vec<AssetRecord>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv(path)
    } else {
        read_workbook(path)
    }
}

/// Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<AssetRecord>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Cannot open workbook {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("Cannot read first worksheet of {}", path.display()))?;

    parse_rows(data_rows(&range))
}

/// Reads a comma separated register. The first line is the header.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<AssetRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open CSV file {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| {
            format!("Invalid CSV record at line {} in {}", idx + FIRST_DATA_ROW, path.display())
        })?;
        let row: Vec<Data> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Data::Empty
                } else {
                    Data::String(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    parse_rows(rows)
}

/// Collects the data rows (everything below the header) of a worksheet,
/// addressed by absolute position so a used range that does not start at A1
/// still lines up with the fixed column order.
fn data_rows(range: &Range<Data>) -> Vec<Vec<Data>> {
    let Some((end_row, _)) = range.end() else {
        return Vec::new();
    };

    (FIRST_DATA_ROW as u32 - 1..=end_row)
        .map(|r| {
            (0..COLUMN_COUNT as u32)
                .map(|c| range.get_value((r, c)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect()
}

/// Parses data rows (header already removed) into asset records.
///
/// Numeric cells that do not coerce to a number read as 0. The net value is
/// taken from its column when that holds a number, otherwise it is derived
/// as gross minus accumulated depreciation. Rates above 1 are percentages.
pub fn parse_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Vec<AssetRecord>>
where
    R: AsRef<[Data]>,
{
    let mut out = Vec::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let row = row.as_ref();
        let sheet_row = idx + FIRST_DATA_ROW;

        let Some(account_code) = account_code(row.get(COL_ACCOUNT)) else {
            tracing::debug!(row = sheet_row, "empty account code, end of asset data");
            break;
        };

        let acquisition_date = parse_excel_date(row.get(COL_DATE)).with_context(|| {
            format!(
                "Invalid acquisition date at row {} (account {})",
                sheet_row, account_code
            )
        })?;

        let book_gross_value = coerce_number(row.get(COL_GROSS)).unwrap_or(0.0);
        let book_accumulated_depreciation = coerce_number(row.get(COL_ACCUMULATED)).unwrap_or(0.0);
        let book_net_value = coerce_number(row.get(COL_NET))
            .unwrap_or(book_gross_value - book_accumulated_depreciation);

        out.push(AssetRecord {
            account_code,
            description: cell_str(row.get(COL_DESCRIPTION))
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            acquisition_date,
            depreciation_rate: normalize_rate(coerce_number(row.get(COL_RATE)).unwrap_or(0.0)),
            depreciation_method: DepreciationMethod::parse(
                &cell_str(row.get(COL_METHOD)).unwrap_or_default(),
            ),
            book_gross_value,
            book_accumulated_depreciation,
            book_net_value,
        });
    }

    tracing::debug!(count = out.len(), "parsed asset rows");
    Ok(out)
}

/// Rates written as whole percentages ("20") are turned into fractions.
pub fn normalize_rate(rate: f64) -> f64 {
    if rate > 1.0 {
        rate / 100.0
    } else {
        rate
    }
}

fn account_code(cell: Option<&Data>) -> Option<AccountCode> {
    let code = match cell? {
        Data::Float(f) => AccountCode::from_number(*f),
        Data::Int(i) => AccountCode::new(i.to_string()),
        other => AccountCode::new(cell_str(Some(other))?),
    };
    (!code.is_empty()).then_some(code)
}

fn cell_str(cell: Option<&Data>) -> Option<String> {
    let c = cell?;
    match c {
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::Empty => None,
        _ => Some(c.to_string()),
    }
}

/// Lenient numeric coercion. `None` means the cell holds no usable number.
fn coerce_number(cell: Option<&Data>) -> Option<f64> {
    let value = match cell? {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Data::String(s) => parse_number_str(s)?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn parse_number_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    // "0,20" style decimal comma
    if s.contains(',') && !s.contains('.') {
        return s.replace(',', ".").parse::<f64>().ok();
    }
    None
}

/// Handles dates that may come as:
/// - Excel serial number or native date cell
/// - "2024-01-01" or "2024-01-01 00:00:00"
/// - "01.01.2024" or "01/01/2024"
fn parse_excel_date(cell: Option<&Data>) -> Result<NaiveDate> {
    let Some(c) = cell else {
        return Err(anyhow!("empty date"));
    };

    match c {
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_string(s),
        Data::Empty => Err(anyhow!("empty date")),
        _ => parse_date_string(&c.to_string()),
    }
}

fn parse_date_string(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(anyhow!("empty date string"));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(anyhow!("unsupported date format: {}", s))
}

/// Excel serial date conversion using 1899-12-30 base (common convention).
fn excel_serial_to_date(v: f64) -> Result<NaiveDate> {
    if !v.is_finite() {
        return Err(anyhow!("non-finite excel date"));
    }
    let days = v.floor() as i64;
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).ok_or_else(|| anyhow!("bad base date"))?;
    Duration::try_days(days)
        .and_then(|d| base.checked_add_signed(d))
        .ok_or_else(|| anyhow!("excel date out of range: {}", v))
}
