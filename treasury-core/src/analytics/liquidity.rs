//! Liquidity snapshot and scoring

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stats::{decimal_mean, population_std_dev, to_f64};
use crate::config::LiquidityConfig;
use crate::domain::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquiditySnapshot {
    pub average_balance: Decimal,
    pub minimum_balance: Decimal,
    pub maximum_balance: Decimal,
    /// Coefficient of variation of the balances
    pub volatility: f64,
    pub idle_days: usize,
    /// 0 (weak) to 10 (strong)
    pub liquidity_score: u8,
    pub threshold_exceeded: bool,
    pub threshold_amount: Decimal,
    pub transactions_analyzed: usize,
}

impl LiquiditySnapshot {
    pub fn zeroed(config: &LiquidityConfig) -> Self {
        Self {
            average_balance: Decimal::ZERO,
            minimum_balance: Decimal::ZERO,
            maximum_balance: Decimal::ZERO,
            volatility: 0.0,
            idle_days: 0,
            liquidity_score: 0,
            threshold_exceeded: false,
            threshold_amount: config.low_balance_threshold,
            transactions_analyzed: 0,
        }
    }
}

/// Count days whose mean balance is high while activity stays low
fn count_idle_days(transactions: &[Transaction], config: &LiquidityConfig) -> usize {
    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal, usize)> = BTreeMap::new();
    for tx in transactions {
        let day = days.entry(tx.date).or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        day.0 += tx.balance_or_zero();
        day.1 += tx.amount.abs();
        day.2 += 1;
    }

    days.values()
        .filter(|(balance_sum, activity, count)| {
            let mean_balance = *balance_sum / Decimal::from(*count);
            mean_balance > config.idle_balance_threshold && *activity < config.idle_activity_threshold
        })
        .count()
}

fn score(average: Decimal, volatility: f64, idle_days: usize, config: &LiquidityConfig) -> u8 {
    let mut score = config.base_score;

    if average > config.strong_balance {
        score += 2;
    } else if average > config.healthy_balance {
        score += 1;
    } else if average < config.weak_balance {
        score -= 2;
    }

    if volatility < config.low_volatility {
        score += 1;
    } else if volatility > config.high_volatility {
        score -= 1;
    }

    if idle_days > config.many_idle_days {
        score -= 1;
    } else if idle_days < config.few_idle_days {
        score += 1;
    }

    score.clamp(0, 10) as u8
}

/// Snapshot over the given (most recent) transactions
pub fn compute_liquidity(transactions: &[Transaction], config: &LiquidityConfig) -> LiquiditySnapshot {
    if transactions.is_empty() {
        return LiquiditySnapshot::zeroed(config);
    }

    let balances: Vec<Decimal> = transactions.iter().map(|tx| tx.balance_or_zero()).collect();
    let average_balance = decimal_mean(&balances).round_dp(2);
    let minimum_balance = balances.iter().copied().min().unwrap_or_default();
    let maximum_balance = balances.iter().copied().max().unwrap_or_default();

    let volatility = if average_balance <= Decimal::ZERO {
        0.0
    } else {
        let values: Vec<f64> = balances.iter().map(|b| to_f64(*b)).collect();
        population_std_dev(&values) / to_f64(average_balance)
    };

    let idle_days = count_idle_days(transactions, config);

    LiquiditySnapshot {
        average_balance,
        minimum_balance,
        maximum_balance,
        volatility,
        idle_days,
        liquidity_score: score(average_balance, volatility, idle_days, config),
        threshold_exceeded: minimum_balance < config.low_balance_threshold,
        threshold_amount: config.low_balance_threshold,
        transactions_analyzed: transactions.len(),
    }
}
