//! Spending patterns per category

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::vendor::{group_vendors, VendorStat};
use crate::config::PatternConfig;
use crate::domain::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    High,
    Medium,
    Low,
}

impl Frequency {
    pub fn classify(count: usize, config: &PatternConfig) -> Self {
        if count > config.high_frequency {
            Frequency::High
        } else if count > config.medium_frequency {
            Frequency::Medium
        } else {
            Frequency::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::High => "high",
            Frequency::Medium => "medium",
            Frequency::Low => "low",
        }
    }
}

/// Seasonality label
///
/// No seasonal decomposition is performed; every category reports `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seasonality {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPattern {
    pub category: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    pub average_amount: Decimal,
    pub frequency: Frequency,
    pub seasonality: Seasonality,
    pub top_vendors: Vec<VendorStat>,
}

/// Group every outflow by category, largest total first
pub fn compute_patterns(transactions: &[Transaction], config: &PatternConfig) -> Vec<SpendingPattern> {
    let mut by_category: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_outflow()) {
        by_category.entry(tx.category_label()).or_default().push(tx);
    }

    let mut patterns: Vec<SpendingPattern> = by_category
        .into_iter()
        .map(|(category, txs)| {
            let total_amount: Decimal = txs.iter().map(|tx| tx.amount.abs()).sum();
            let transaction_count = txs.len();
            let average_amount = (total_amount / Decimal::from(transaction_count)).round_dp(2);

            let mut top_vendors = group_vendors(txs.iter().copied(), Some(total_amount));
            top_vendors.truncate(config.vendor_limit);

            SpendingPattern {
                category: category.to_string(),
                total_amount,
                transaction_count,
                average_amount,
                frequency: Frequency::classify(transaction_count, config),
                seasonality: Seasonality::default(),
                top_vendors,
            }
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{categorized, day, offset};
    use crate::domain::TransactionType;

    fn paid(amount: i64, category: &str, vendor: Option<&str>) -> Transaction {
        let mut t = categorized(amount, day(1), category);
        t.counterparty = vendor.map(str::to_string);
        t.transaction_type = TransactionType::Check;
        t
    }

    #[test]
    fn test_frequency_labels() {
        let config = PatternConfig::default();
        assert_eq!(Frequency::classify(31, &config), Frequency::High);
        assert_eq!(Frequency::classify(30, &config), Frequency::Medium);
        assert_eq!(Frequency::classify(11, &config), Frequency::Medium);
        assert_eq!(Frequency::classify(10, &config), Frequency::Low);
    }

    #[test]
    fn test_groups_outflows_by_category() {
        let mut txs: Vec<_> = (0..12).map(|i| categorized(-10, offset(i), "Supplies")).collect();
        txs.push(categorized(-500, day(2), "Rent"));
        txs.push(categorized(10_000, day(3), "Sales"));

        let patterns = compute_patterns(&txs, &PatternConfig::default());
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].category, "Rent");
        assert_eq!(patterns[0].frequency, Frequency::Low);

        let supplies = &patterns[1];
        assert_eq!(supplies.total_amount, Decimal::new(120, 0));
        assert_eq!(supplies.average_amount, Decimal::new(10, 0));
        assert_eq!(supplies.frequency, Frequency::Medium);
        assert_eq!(supplies.seasonality, Seasonality::Medium);
    }

    #[test]
    fn test_vendor_sub_list_is_capped_and_relative_to_category() {
        let mut txs: Vec<_> = (1..=7)
            .map(|i| paid(-i * 10, "Services", Some(&format!("Vendor {}", i))))
            .collect();
        txs.push(paid(-20, "Services", None));

        let patterns = compute_patterns(&txs, &PatternConfig::default());
        let services = &patterns[0];
        // 10 + 20 + ... + 70 plus the anonymous 20
        assert_eq!(services.total_amount, Decimal::new(300, 0));
        assert_eq!(services.top_vendors.len(), 5);
        assert_eq!(services.top_vendors[0].vendor_name, "Vendor 7");
        assert!((services.top_vendors[0].percentage - 70.0 / 3.0).abs() < 1e-9);
        assert!(services.top_vendors[0]
            .payment_methods
            .contains(&TransactionType::Check));
    }
}
