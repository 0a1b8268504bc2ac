//! Aggregates valuation results into double-entry journal vouchers.
//!
//! Results are grouped by fixed-asset account code in first-seen order, and
//! each group yields at most one revaluation voucher and one depreciation
//! voucher. Amounts are summed unrounded and rounded to cents only when a
//! voucher line is emitted.

pub mod chart;

use models::{AccountCode, JournalLine, JournalVoucher, ValuationResult, VoucherSet};
use std::collections::HashMap;

pub use chart::{AccountFamilyRule, ChartOfAccounts};

/// Aggregated differences at or below this amount are treated as rounding noise.
pub const MATERIALITY_THRESHOLD: f64 = 0.01;

/// Results sharing one fixed-asset account code.
#[derive(Debug)]
pub struct AccountGroup<'a> {
    pub account: &'a AccountCode,
    pub members: Vec<&'a ValuationResult>,
}

/// Groups results by account code, keeping the order in which codes first appear.
pub fn group_by_account(results: &[ValuationResult]) -> Vec<AccountGroup<'_>> {
    let mut index: HashMap<&AccountCode, usize> = HashMap::new();
    let mut groups: Vec<AccountGroup<'_>> = Vec::new();

    for result in results {
        let code = &result.asset.account_code;
        let slot = *index.entry(code).or_insert_with(|| {
            groups.push(AccountGroup {
                account: code,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(result);
    }

    groups
}

pub fn build_vouchers(results: &[ValuationResult], chart: &ChartOfAccounts) -> VoucherSet {
    let groups = group_by_account(results);

    let revaluation: Vec<JournalVoucher> = groups
        .iter()
        .filter_map(|g| revaluation_voucher(g, chart))
        .collect();
    let depreciation: Vec<JournalVoucher> = groups
        .iter()
        .filter_map(|g| depreciation_voucher(g, chart))
        .collect();

    tracing::debug!(
        accounts = groups.len(),
        revaluation = revaluation.len(),
        depreciation = depreciation.len(),
        "built journal vouchers"
    );

    VoucherSet {
        revaluation,
        depreciation,
    }
}

/// Debit the asset account for the gross increase, credit accumulated
/// depreciation for its increase and the revaluation reserve for the rest.
pub fn revaluation_voucher(group: &AccountGroup<'_>, chart: &ChartOfAccounts) -> Option<JournalVoucher> {
    let book_gross: f64 = group.members.iter().map(|r| r.asset.book_gross_value).sum();
    let revalued_gross: f64 = group.members.iter().map(|r| r.revalued_gross_value).sum();
    let book_accumulated: f64 = group
        .members
        .iter()
        .map(|r| r.asset.book_accumulated_depreciation)
        .sum();
    let revalued_accumulated: f64 = group
        .members
        .iter()
        .map(|r| r.revalued_accumulated_depreciation)
        .sum();

    let gross_delta = revalued_gross - book_gross;
    let accumulated_delta = revalued_accumulated - book_accumulated;
    let net_delta = gross_delta - accumulated_delta;

    if gross_delta.abs() <= MATERIALITY_THRESHOLD && accumulated_delta.abs() <= MATERIALITY_THRESHOLD {
        return None;
    }

    let accumulated_account = chart.accumulated_depreciation_account(group.account);
    let lines = [
        entry(group.account, gross_delta, Side::Debit),
        entry(accumulated_account, accumulated_delta, Side::Credit),
        entry(&chart.revaluation_reserve_account, net_delta, Side::Credit),
    ]
    .into_iter()
    .flatten()
    .collect();

    Some(JournalVoucher {
        description: format!("Revaluation - {}", group.account),
        source_account: group.account.clone(),
        lines,
    })
}

/// Debit depreciation expense, credit accumulated depreciation.
pub fn depreciation_voucher(group: &AccountGroup<'_>, chart: &ChartOfAccounts) -> Option<JournalVoucher> {
    let period_total: f64 = group.members.iter().map(|r| r.period_depreciation).sum();
    if period_total.abs() <= MATERIALITY_THRESHOLD {
        return None;
    }

    let accumulated_account = chart.accumulated_depreciation_account(group.account);
    let lines = [
        entry(&chart.depreciation_expense_account, period_total, Side::Debit),
        entry(accumulated_account, period_total, Side::Credit),
    ]
    .into_iter()
    .flatten()
    .collect();

    Some(JournalVoucher {
        description: format!("Period Depreciation - {}", group.account),
        source_account: group.account.clone(),
        lines,
    })
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Debit,
    Credit,
}

/// One voucher line with the amount rounded to cents. Lines that round to
/// zero are dropped; negative amounts are posted on the opposite side.
fn entry(account: &AccountCode, amount: f64, side: Side) -> Option<JournalLine> {
    let amount = round2(amount);
    if amount == 0.0 {
        return None;
    }
    let side = match (side, amount < 0.0) {
        (Side::Debit, false) | (Side::Credit, true) => Side::Debit,
        (Side::Credit, false) | (Side::Debit, true) => Side::Credit,
    };
    Some(match side {
        Side::Debit => JournalLine::debit(account.clone(), amount.abs()),
        Side::Credit => JournalLine::credit(account.clone(), amount.abs()),
    })
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{AssetRecord, DepreciationMethod};

    fn result(code: &str, gross: f64, accumulated: f64, rate: f64, period_depr: f64) -> ValuationResult {
        let revalued_gross = gross * (1.0 + rate);
        let revalued_accumulated = accumulated * (1.0 + rate);
        ValuationResult {
            asset: AssetRecord {
                account_code: AccountCode::new(code),
                description: format!("asset {}", code),
                acquisition_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                depreciation_rate: 0.2,
                depreciation_method: DepreciationMethod::Normal,
                book_gross_value: gross,
                book_accumulated_depreciation: accumulated,
                book_net_value: gross - accumulated,
            },
            revaluation_rate: rate,
            revalued_gross_value: revalued_gross,
            revalued_accumulated_depreciation: revalued_accumulated,
            revalued_net_value: revalued_gross - revalued_accumulated,
            annual_depreciation: period_depr,
            period_depreciation: period_depr,
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let results = vec![
            result("255", 1.0, 0.0, 0.0, 0.0),
            result("253", 1.0, 0.0, 0.0, 0.0),
            result("255", 1.0, 0.0, 0.0, 0.0),
            result("254", 1.0, 0.0, 0.0, 0.0),
        ];
        let groups = group_by_account(&results);
        let codes: Vec<&str> = groups.iter().map(|g| g.account.as_str()).collect();
        assert_eq!(codes, vec!["255", "253", "254"]);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_revaluation_voucher_lines() {
        let results = vec![
            result("255", 1_000_000.0, 190_000.0, 0.15, 0.0),
            result("255", 200_000.0, 10_000.0, 0.15, 0.0),
        ];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        assert_eq!(set.revaluation.len(), 1);

        let v = &set.revaluation[0];
        assert_eq!(v.description, "Revaluation - 255");
        assert_eq!(v.lines.len(), 3);
        assert_eq!(v.lines[0], JournalLine::debit(AccountCode::new("255"), 180_000.0));
        assert_eq!(v.lines[1], JournalLine::credit(AccountCode::new("257"), 30_000.0));
        assert_eq!(v.lines[2], JournalLine::credit(AccountCode::new("522"), 150_000.0));
        assert!(v.is_balanced(MATERIALITY_THRESHOLD));
    }

    #[test]
    fn test_materiality_suppresses_rounding_noise() {
        let results = vec![
            result("254", 3_000_000.0, 600_000.0, 0.0, 0.0),
            result("260", 0.5, 0.25, 0.01, 0.004),
        ];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        assert!(set.revaluation.is_empty());
        assert!(set.depreciation.is_empty());
    }

    #[test]
    fn test_zero_accumulated_delta_line_is_omitted() {
        let results = vec![result("254", 2_000_000.0, 0.0, 0.10, 0.0)];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        let v = &set.revaluation[0];
        assert_eq!(v.lines.len(), 2);
        assert!(v.lines.iter().all(|l| (l.debit == 0.0) != (l.credit == 0.0)));
        assert!(v.is_balanced(MATERIALITY_THRESHOLD));
    }

    #[test]
    fn test_depreciation_voucher_routes_by_account_family() {
        let results = vec![
            result("254", 100.0, 0.0, 0.0, 600_000.0),
            result("264", 100.0, 0.0, 0.0, 1_234.567),
            result("254", 100.0, 0.0, 0.0, 150_000.0),
        ];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        assert_eq!(set.depreciation.len(), 2);

        let first = &set.depreciation[0];
        assert_eq!(first.description, "Period Depreciation - 254");
        assert_eq!(first.lines[0], JournalLine::debit(AccountCode::new("770"), 750_000.0));
        assert_eq!(first.lines[1], JournalLine::credit(AccountCode::new("257"), 750_000.0));

        let second = &set.depreciation[1];
        assert_eq!(second.lines[0], JournalLine::debit(AccountCode::new("770"), 1_234.57));
        assert_eq!(second.lines[1], JournalLine::credit(AccountCode::new("268"), 1_234.57));
    }

    #[test]
    fn test_negative_revaluation_posts_on_opposite_sides() {
        let results = vec![result("253", 1_000.0, 400.0, -0.10, 0.0)];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        let v = &set.revaluation[0];
        assert_eq!(v.lines[0], JournalLine::credit(AccountCode::new("253"), 100.0));
        assert_eq!(v.lines[1], JournalLine::debit(AccountCode::new("257"), 40.0));
        assert_eq!(v.lines[2], JournalLine::debit(AccountCode::new("522"), 60.0));
        assert!(v.is_balanced(MATERIALITY_THRESHOLD));
    }

    #[test]
    fn test_every_voucher_balances() {
        let results = vec![
            result("253", 5_000_000.0, 5_000_000.0, 0.0, 0.0),
            result("254", 3_000_000.0, 600_000.0, 0.0, 600_000.0),
            result("254", 2_000_000.0, 0.0, 0.0, 400_000.0),
            result("255", 1_000_000.0, 190_000.0, 0.15, 186_300.0),
            result("264", 333.333, 111.111, 0.1234, 77.777),
        ];
        let set = build_vouchers(&results, &ChartOfAccounts::default());
        for v in set.revaluation.iter().chain(set.depreciation.iter()) {
            assert!(v.is_balanced(MATERIALITY_THRESHOLD), "{} does not balance", v.description);
        }
    }
}
