use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Invocation parameters
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("Missing parameter: {0}")]
    Missing(String),

    #[error("Invalid transaction year: {0}")]
    InvalidYear(String),

    #[error("Invalid period: {0} (expected 1, 2, 3 or 4)")]
    InvalidPeriod(String),

    #[error("Invalid revaluation rate: {0}")]
    InvalidRate(String),
}

/// Reporting period the annual depreciation is apportioned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    FirstQuarter,
    HalfYear,
    NineMonths,
    Annual,
}

impl Period {
    /// Lenient mapping: any code other than 1, 2 or 3 is a full year.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Period::FirstQuarter,
            2 => Period::HalfYear,
            3 => Period::NineMonths,
            _ => Period::Annual,
        }
    }

    /// Strict mapping used at the invocation boundary: only 1-4 are accepted.
    pub fn parse_param(raw: &str) -> Result<Self, ParameterError> {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(code @ 1..=4) => Ok(Period::from_code(code)),
            _ => Err(ParameterError::InvalidPeriod(trimmed.to_string())),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Period::FirstQuarter => 1,
            Period::HalfYear => 2,
            Period::NineMonths => 3,
            Period::Annual => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::FirstQuarter => "1st Quarter",
            Period::HalfYear => "Half Year",
            Period::NineMonths => "9 Months",
            Period::Annual => "Annual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of a single run, as received from a CLI or HTTP form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub transaction_year: i32,
    pub period: Period,
    /// Global revaluation rate as a fraction (15.5% is 0.155).
    pub global_rate: f64,
}

impl RunParameters {
    /// Parses raw form values. The rate is a percentage and may use either
    /// a comma or a dot as decimal separator ("15,50" or "15.50").
    pub fn parse(year: &str, period: &str, rate_percent: &str) -> Result<Self, ParameterError> {
        let year = year.trim();
        if year.is_empty() {
            return Err(ParameterError::Missing("transaction_year".to_string()));
        }
        let transaction_year = year
            .parse::<i32>()
            .map_err(|_| ParameterError::InvalidYear(year.to_string()))?;

        if period.trim().is_empty() {
            return Err(ParameterError::Missing("period".to_string()));
        }
        let period = Period::parse_param(period)?;

        let rate = rate_percent.trim();
        if rate.is_empty() {
            return Err(ParameterError::Missing("revaluation_rate".to_string()));
        }
        let percent = rate
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParameterError::InvalidRate(rate.to_string()))?;

        Ok(Self {
            transaction_year,
            period,
            global_rate: percent / 100.0,
        })
    }
}

/// Ledger account identifier. Input cells may hold text or numbers, so the
/// code is kept in its trimmed textual form and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(String);

impl AccountCode {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Integer-valued numbers are rendered without a decimal part (254.0 -> "254").
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Self((value as i64).to_string())
        } else {
            Self(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// The numeric form of the code, if it is a plain integer.
    pub fn as_integer(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountCode {
    fn from(value: &str) -> Self {
        AccountCode::new(value)
    }
}

/// Depreciation convention of an asset. Free text in the input; anything
/// unrecognised is kept verbatim and depreciated linearly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepreciationMethod {
    Normal,
    Accelerated,
    Other(String),
}

impl DepreciationMethod {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "normal" => DepreciationMethod::Normal,
            "accelerated" | "hızlı" | "hizli" => DepreciationMethod::Accelerated,
            _ => DepreciationMethod::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DepreciationMethod::Normal => "Normal",
            DepreciationMethod::Accelerated => "Accelerated",
            DepreciationMethod::Other(raw) => raw,
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Input records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub account_code: AccountCode,
    pub description: String,
    pub acquisition_date: NaiveDate,
    /// Fraction in (0, 1]; percentages are normalised by the reader.
    pub depreciation_rate: f64,
    pub depreciation_method: DepreciationMethod,
    pub book_gross_value: f64,
    pub book_accumulated_depreciation: f64,
    pub book_net_value: f64,
}

// Derived records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    #[serde(flatten)]
    pub asset: AssetRecord,
    pub revaluation_rate: f64,
    pub revalued_gross_value: f64,
    pub revalued_accumulated_depreciation: f64,
    pub revalued_net_value: f64,
    pub annual_depreciation: f64,
    pub period_depreciation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub account: AccountCode,
    pub debit: f64,
    pub credit: f64,
}

impl JournalLine {
    pub fn debit(account: AccountCode, amount: f64) -> Self {
        Self {
            account,
            debit: amount,
            credit: 0.0,
        }
    }

    pub fn credit(account: AccountCode, amount: f64) -> Self {
        Self {
            account,
            debit: 0.0,
            credit: amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalVoucher {
    pub description: String,
    /// Fixed-asset account the voucher was aggregated for.
    pub source_account: AccountCode,
    pub lines: Vec<JournalLine>,
}

impl JournalVoucher {
    pub fn total_debit(&self) -> f64 {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> f64 {
        self.lines.iter().map(|l| l.credit).sum()
    }

    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total_debit() - self.total_credit()).abs() <= tolerance
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoucherSet {
    pub revaluation: Vec<JournalVoucher>,
    pub depreciation: Vec<JournalVoucher>,
}

impl VoucherSet {
    pub fn voucher_count(&self) -> usize {
        self.revaluation.len() + self.depreciation.len()
    }
}

// Output models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub asset_count: usize,
    pub revaluation_voucher_count: usize,
    pub depreciation_voucher_count: usize,
    pub output_file: String,
}
