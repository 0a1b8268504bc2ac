//! # Settings Loader
//!
//! Loads the optional `settings.json` that customises the chart of accounts
//! used when posting revaluation and depreciation vouchers.
//!
//! Every field is optional; anything left out keeps the default from
//! [`ChartOfAccounts::default`].
//!
//! ```json
//! {
//!   "chart_of_accounts": {
//!     "revaluation_reserve_account": "522",
//!     "depreciation_expense_account": "770",
//!     "accumulated_depreciation_rules": [
//!       { "prefix": "25", "accumulated_depreciation_account": "257" }
//!     ],
//!     "default_accumulated_depreciation_account": "268",
//!     "account_names": { "254": "Taşıtlar" }
//!   }
//! }
//! ```
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! let settings = settings_loader::load_settings("config/settings.json")?;
//! let chart = settings.chart_of_accounts();
//!
//! // Missing path means defaults
//! let path: Option<PathBuf> = None;
//! let chart = settings_loader::load_chart_of_accounts(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use journal::{AccountFamilyRule, ChartOfAccounts};
use models::AccountCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub chart_of_accounts: Option<ChartOfAccountsSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartOfAccountsSettings {
    pub revaluation_reserve_account: Option<AccountCode>,
    pub depreciation_expense_account: Option<AccountCode>,
    pub accumulated_depreciation_rules: Option<Vec<AccountFamilyRule>>,
    pub default_accumulated_depreciation_account: Option<AccountCode>,
    /// Merged over the default names.
    #[serde(default)]
    pub account_names: BTreeMap<String, String>,
}

impl Settings {
    /// Chart of accounts with the overrides from this file applied.
    pub fn chart_of_accounts(&self) -> ChartOfAccounts {
        let mut chart = ChartOfAccounts::default();
        let Some(overrides) = &self.chart_of_accounts else {
            return chart;
        };

        if let Some(code) = &overrides.revaluation_reserve_account {
            chart.revaluation_reserve_account = code.clone();
        }
        if let Some(code) = &overrides.depreciation_expense_account {
            chart.depreciation_expense_account = code.clone();
        }
        if let Some(rules) = &overrides.accumulated_depreciation_rules {
            chart.accumulated_depreciation_rules = rules.clone();
        }
        if let Some(code) = &overrides.default_accumulated_depreciation_account {
            chart.default_accumulated_depreciation_account = code.clone();
        }
        chart.account_names.extend(
            overrides
                .account_names
                .iter()
                .map(|(k, v)| (k.trim().to_string(), v.clone())),
        );
        chart
    }
}

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Chart of accounts from an optional settings file; defaults when no path is given.
/// A path that is given but unreadable is an error.
pub fn load_chart_of_accounts(path: Option<&PathBuf>) -> Result<ChartOfAccounts> {
    Ok(load_optional_settings(path)?
        .unwrap_or_default()
        .chart_of_accounts())
}
