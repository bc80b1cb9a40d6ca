//! Overview aggregation - headline cash-flow figures for a filtered set

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::PeriodBounds;
use super::stats::{decimal_mean, to_f64, FlowTotals};
use crate::config::AnalyticsConfig;
use crate::domain::Transaction;

/// Headline figures for a client over a filtered transaction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    /// Always exactly `total_inflow - total_outflow`
    pub net_cash_flow: Decimal,
    pub transaction_count: usize,
    pub average_daily_balance: Decimal,
    pub liquidity_ratio: f64,
    /// Balance above the required cash buffer
    pub idle_balance: Decimal,
    pub period: PeriodBounds,
}

impl Overview {
    pub fn empty(period: PeriodBounds) -> Self {
        Self {
            total_inflow: Decimal::ZERO,
            total_outflow: Decimal::ZERO,
            net_cash_flow: Decimal::ZERO,
            transaction_count: 0,
            average_daily_balance: Decimal::ZERO,
            liquidity_ratio: 0.0,
            idle_balance: Decimal::ZERO,
            period,
        }
    }
}

/// Compute the overview for `transactions`
///
/// The average daily balance uses the most recent
/// `config.overview_balance_window` rows by date, with missing running
/// balances counted as zero.
pub fn compute_overview(
    transactions: &[Transaction],
    period: PeriodBounds,
    config: &AnalyticsConfig,
) -> Overview {
    if transactions.is_empty() {
        return Overview::empty(period);
    }

    let totals = FlowTotals::from_transactions(transactions);

    // Stable sort keeps posting order within a day, so the latest rows come last
    let mut by_date: Vec<&Transaction> = transactions.iter().collect();
    by_date.sort_by_key(|tx| tx.date);
    let balances: Vec<Decimal> = by_date
        .iter()
        .rev()
        .take(config.overview_balance_window)
        .map(|tx| tx.balance_or_zero())
        .collect();
    let average_daily_balance = decimal_mean(&balances).round_dp(2);

    let liquidity_ratio = if totals.outflow.is_zero() {
        0.0
    } else {
        to_f64(average_daily_balance) / to_f64(totals.outflow)
    };

    let required_cash = config.required_cash_buffer * totals.outflow;
    let idle_balance = (average_daily_balance - required_cash).max(Decimal::ZERO);

    Overview {
        total_inflow: totals.inflow,
        total_outflow: totals.outflow,
        net_cash_flow: totals.net(),
        transaction_count: totals.count,
        average_daily_balance,
        liquidity_ratio,
        idle_balance,
        period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{day, tx, tx_with_balance};

    #[test]
    fn test_inflow_outflow_scenario() {
        let txs = vec![tx(1000, day(1)), tx(-400, day(1)), tx(-100, day(2))];
        let overview = compute_overview(&txs, PeriodBounds::default(), &AnalyticsConfig::default());

        assert_eq!(overview.total_inflow, Decimal::new(1000, 0));
        assert_eq!(overview.total_outflow, Decimal::new(500, 0));
        assert_eq!(overview.net_cash_flow, Decimal::new(500, 0));
        assert_eq!(overview.transaction_count, 3);
        // no running balances at all
        assert_eq!(overview.average_daily_balance, Decimal::ZERO);
        assert_eq!(overview.liquidity_ratio, 0.0);
        assert_eq!(overview.idle_balance, Decimal::ZERO);
    }

    #[test]
    fn test_net_cash_flow_identity_is_exact() {
        let txs = vec![
            tx_with_balance(day(1), "0.10", "100"),
            tx_with_balance(day(2), "0.20", "100"),
            tx_with_balance(day(3), "-0.30", "100"),
        ];
        let overview = compute_overview(&txs, PeriodBounds::default(), &AnalyticsConfig::default());
        assert_eq!(
            overview.total_inflow - overview.total_outflow,
            overview.net_cash_flow
        );
        assert_eq!(overview.net_cash_flow, Decimal::ZERO);
    }

    #[test]
    fn test_average_balance_uses_most_recent_window() {
        let config = AnalyticsConfig {
            overview_balance_window: 2,
            ..AnalyticsConfig::default()
        };
        let txs = vec![
            tx_with_balance(day(1), "-10", "1000000"),
            tx_with_balance(day(2), "-10", "300"),
            tx_with_balance(day(3), "-10", "500"),
        ];
        let overview = compute_overview(&txs, PeriodBounds::default(), &config);
        assert_eq!(overview.average_daily_balance, Decimal::new(400, 0));
        assert_eq!(overview.total_outflow, Decimal::new(30, 0));
        assert!((overview.liquidity_ratio - 400.0 / 30.0).abs() < 1e-9);
        // 400 - 0.1 * 30
        assert_eq!(overview.idle_balance, Decimal::new(397, 0));
    }

    #[test]
    fn test_window_keeps_latest_postings_of_the_last_day() {
        let config = AnalyticsConfig {
            overview_balance_window: 1,
            ..AnalyticsConfig::default()
        };
        let txs = vec![
            tx_with_balance(day(4), "-10", "500"),
            tx_with_balance(day(5), "-10", "100"),
            tx_with_balance(day(5), "-10", "90"),
        ];
        let overview = compute_overview(&txs, PeriodBounds::default(), &config);
        assert_eq!(overview.average_daily_balance, Decimal::new(90, 0));
    }

    #[test]
    fn test_idle_balance_never_negative() {
        let txs = vec![tx_with_balance(day(1), "-100000", "50")];
        let overview = compute_overview(&txs, PeriodBounds::default(), &AnalyticsConfig::default());
        assert_eq!(overview.idle_balance, Decimal::ZERO);
    }

    #[test]
    fn test_empty_set_is_zeroed() {
        let overview = compute_overview(&[], PeriodBounds::default(), &AnalyticsConfig::default());
        assert_eq!(overview, Overview::empty(PeriodBounds::default()));
    }
}
