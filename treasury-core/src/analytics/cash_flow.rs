//! Cash-flow bucketing by calendar period

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::{Period, PeriodBounds};
use super::stats::FlowTotals;
use crate::domain::Transaction;

/// Aggregated flows for one calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub period_key: String,
    pub inflow: Decimal,
    pub outflow: Decimal,
    /// Running balance of the last transaction seen in the bucket
    pub balance: Decimal,
    pub net_flow: Decimal,
    pub transaction_count: usize,
}

impl PeriodBucket {
    fn open(period_key: String, carried_balance: Decimal) -> Self {
        Self {
            period_key,
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            balance: carried_balance,
            net_flow: Decimal::ZERO,
            transaction_count: 0,
        }
    }
}

/// Group transactions into buckets sorted ascending by key
///
/// Transactions are processed in date order (stable for equal dates). A
/// bucket without any running balance keeps the balance carried over from
/// the previously processed row, or 0 before the first one.
pub fn bucket_transactions(transactions: &[Transaction], period: Period) -> Vec<PeriodBucket> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| tx.date);

    let mut buckets: BTreeMap<String, PeriodBucket> = BTreeMap::new();
    let mut last_balance = Decimal::ZERO;

    for tx in ordered {
        let key = period.bucket_key(tx.date);
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| PeriodBucket::open(key, last_balance));

        if tx.amount > Decimal::ZERO {
            bucket.inflow += tx.amount;
        } else if tx.amount < Decimal::ZERO {
            bucket.outflow += tx.amount.abs();
        }
        bucket.transaction_count += 1;

        if let Some(balance) = tx.balance_after {
            bucket.balance = balance;
            last_balance = balance;
        }
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            bucket.net_flow = bucket.inflow - bucket.outflow;
            bucket
        })
        .collect()
}

/// Cash-flow response: buckets plus totals over the same set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowAnalysis {
    pub period: Period,
    pub bounds: PeriodBounds,
    pub buckets: Vec<PeriodBucket>,
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    pub net_cash_flow: Decimal,
}

pub fn compute_cash_flow(
    transactions: &[Transaction],
    period: Period,
    bounds: PeriodBounds,
) -> CashFlowAnalysis {
    let totals = FlowTotals::from_transactions(transactions);
    CashFlowAnalysis {
        period,
        bounds,
        buckets: bucket_transactions(transactions, period),
        total_inflow: totals.inflow,
        total_outflow: totals.outflow,
        net_cash_flow: totals.net(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{date, day, tx, tx_with_balance};

    #[test]
    fn test_daily_buckets_sum_flows() {
        let txs = vec![tx(1000, day(1)), tx(-400, day(1)), tx(-100, day(2))];
        let buckets = bucket_transactions(&txs, Period::Daily);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period_key, "2025-01-01");
        assert_eq!(buckets[0].inflow, Decimal::new(1000, 0));
        assert_eq!(buckets[0].outflow, Decimal::new(400, 0));
        assert_eq!(buckets[0].net_flow, Decimal::new(600, 0));
        assert_eq!(buckets[0].transaction_count, 2);
        assert_eq!(buckets[1].net_flow, Decimal::new(-100, 0));
    }

    #[test]
    fn test_balance_is_last_seen_and_carried_forward() {
        let txs = vec![
            tx_with_balance(day(3), "-50", "950"),
            tx_with_balance(day(1), "1000", "1000"),
            tx(-20, day(10)),
        ];
        let buckets = bucket_transactions(&txs, Period::Weekly);

        // 2025-01-01 is a Wednesday, so days 1 and 3 share the week of 2024-12-29
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period_key, "2024-12-29");
        assert_eq!(buckets[0].balance, Decimal::new(950, 0));
        // no balance info in the second bucket
        assert_eq!(buckets[1].period_key, "2025-01-05");
        assert_eq!(buckets[1].balance, Decimal::new(950, 0));
    }

    #[test]
    fn test_first_bucket_without_balance_defaults_to_zero() {
        let buckets = bucket_transactions(&[tx(10, day(1))], Period::Monthly);
        assert_eq!(buckets[0].balance, Decimal::ZERO);
    }

    #[test]
    fn test_buckets_sorted_and_idempotent() {
        let txs = vec![
            tx(5, date(2025, 12, 31)),
            tx(7, date(2024, 3, 1)),
            tx(-3, date(2025, 1, 15)),
        ];
        let first = bucket_transactions(&txs, Period::Monthly);
        let keys: Vec<_> = first.iter().map(|b| b.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-03", "2025-01", "2025-12"]);
        assert_eq!(first, bucket_transactions(&txs, Period::Monthly));

        let years = bucket_transactions(&txs, Period::Yearly);
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].net_flow, Decimal::new(2, 0));
    }

    #[test]
    fn test_cash_flow_totals_match_buckets() {
        let txs = vec![tx(1000, day(1)), tx(-400, day(1)), tx(-100, day(20))];
        let analysis = compute_cash_flow(&txs, Period::Daily, PeriodBounds::default());
        let bucket_net: Decimal = analysis.buckets.iter().map(|b| b.net_flow).sum();
        assert_eq!(bucket_net, analysis.net_cash_flow);
        assert_eq!(analysis.total_inflow - analysis.total_outflow, analysis.net_cash_flow);
    }
}
