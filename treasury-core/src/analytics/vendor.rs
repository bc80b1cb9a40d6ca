//! Vendor spend analysis

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stats::percentage;
use crate::domain::{Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStat {
    pub vendor_name: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    pub percentage: f64,
    pub payment_methods: BTreeSet<TransactionType>,
}

/// Group outflows with a counterparty by vendor, sorted by spend
///
/// Percentages are relative to `denominator`; pass `None` to use the total
/// spend across the grouped vendors.
pub fn group_vendors<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    denominator: Option<Decimal>,
) -> Vec<VendorStat> {
    let mut groups: HashMap<&str, VendorStat> = HashMap::new();

    for tx in transactions {
        if !tx.is_outflow() {
            continue;
        }
        let Some(vendor) = tx.counterparty.as_deref() else {
            continue;
        };
        let stat = groups.entry(vendor).or_insert_with(|| VendorStat {
            vendor_name: vendor.to_string(),
            total_amount: Decimal::ZERO,
            transaction_count: 0,
            percentage: 0.0,
            payment_methods: BTreeSet::new(),
        });
        stat.total_amount += tx.amount.abs();
        stat.transaction_count += 1;
        stat.payment_methods.insert(tx.transaction_type);
    }

    let total = denominator.unwrap_or_else(|| groups.values().map(|v| v.total_amount).sum());

    let mut vendors: Vec<VendorStat> = groups
        .into_values()
        .map(|mut stat| {
            stat.percentage = percentage(stat.total_amount, total);
            stat
        })
        .collect();
    vendors.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.vendor_name.cmp(&b.vendor_name))
    });
    vendors
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAnalysis {
    pub vendors: Vec<VendorStat>,
    /// Spend across every vendor, including those past the limit
    pub total_vendor_spend: Decimal,
    pub vendor_count: usize,
}

pub fn compute_vendors(transactions: &[Transaction], limit: usize) -> VendorAnalysis {
    let mut vendors = group_vendors(transactions, None);
    let total_vendor_spend = vendors.iter().map(|v| v.total_amount).sum();
    let vendor_count = vendors.len();
    vendors.truncate(limit);

    VendorAnalysis {
        vendors,
        total_vendor_spend,
        vendor_count,
    }
}
