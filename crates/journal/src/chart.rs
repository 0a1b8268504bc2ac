use models::AccountCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routes fixed-asset accounts whose code starts with `prefix` to an
/// accumulated-depreciation account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountFamilyRule {
    pub prefix: String,
    pub accumulated_depreciation_account: AccountCode,
}

/// Counter-accounts used when posting revaluation and depreciation.
/// Defaults follow the Turkish uniform chart of accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    pub revaluation_reserve_account: AccountCode,
    pub depreciation_expense_account: AccountCode,
    /// Checked in order; the first matching prefix wins.
    pub accumulated_depreciation_rules: Vec<AccountFamilyRule>,
    pub default_accumulated_depreciation_account: AccountCode,
    pub account_names: BTreeMap<String, String>,
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        let account_names = [
            ("250", "Arazi ve Arsalar"),
            ("251", "Yeraltı ve Yerüstü Düzenleri"),
            ("252", "Binalar"),
            ("253", "Tesis, Makine ve Cihazlar"),
            ("254", "Taşıtlar"),
            ("255", "Demirbaşlar"),
            ("256", "Diğer Maddi Duran Varlıklar"),
            ("257", "Birikmiş Amortismanlar (-)"),
            ("260", "Haklar"),
            ("264", "Özel Maliyetler"),
            ("268", "Birikmiş Amortismanlar (-)"),
            ("522", "MDV Yeniden Değerleme Artışları"),
            ("770", "Genel Yönetim Giderleri"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        Self {
            revaluation_reserve_account: AccountCode::new("522"),
            depreciation_expense_account: AccountCode::new("770"),
            accumulated_depreciation_rules: vec![AccountFamilyRule {
                prefix: "25".to_string(),
                accumulated_depreciation_account: AccountCode::new("257"),
            }],
            default_accumulated_depreciation_account: AccountCode::new("268"),
            account_names,
        }
    }
}

impl ChartOfAccounts {
    pub fn accumulated_depreciation_account(&self, fixed_asset: &AccountCode) -> &AccountCode {
        self.accumulated_depreciation_rules
            .iter()
            .find(|rule| fixed_asset.starts_with(&rule.prefix))
            .map(|rule| &rule.accumulated_depreciation_account)
            .unwrap_or(&self.default_accumulated_depreciation_account)
    }

    pub fn account_name(&self, code: &AccountCode) -> Option<&str> {
        self.account_names.get(code.as_str()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_family_routing() {
        let chart = ChartOfAccounts::default();
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("254")).as_str(), "257");
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("25")).as_str(), "257");
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("260")).as_str(), "268");
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("2")).as_str(), "268");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut chart = ChartOfAccounts::default();
        chart.accumulated_depreciation_rules.insert(
            0,
            AccountFamilyRule {
                prefix: "252".to_string(),
                accumulated_depreciation_account: AccountCode::new("257.01"),
            },
        );
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("252")).as_str(), "257.01");
        assert_eq!(chart.accumulated_depreciation_account(&AccountCode::new("253")).as_str(), "257");
    }

    #[test]
    fn test_account_names() {
        let chart = ChartOfAccounts::default();
        assert_eq!(chart.account_name(&AccountCode::new("522")), Some("MDV Yeniden Değerleme Artışları"));
        assert_eq!(chart.account_name(&AccountCode::new("999")), None);
    }
}
