//! Numeric helpers shared by the aggregations

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::Transaction;

/// Lossy conversion used wherever exact money turns into a statistic
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Running inflow/outflow totals; outflow is kept as a positive magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowTotals {
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub count: usize,
}

impl FlowTotals {
    pub fn add(&mut self, tx: &Transaction) {
        if tx.amount > Decimal::ZERO {
            self.inflow += tx.amount;
        } else if tx.amount < Decimal::ZERO {
            self.outflow += tx.amount.abs();
        }
        self.count += 1;
    }

    pub fn net(&self) -> Decimal {
        self.inflow - self.outflow
    }

    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();
        for tx in transactions {
            totals.add(tx);
        }
        totals
    }
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of exact amounts; 0 for an empty slice
pub fn decimal_mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().copied().sum();
    sum / Decimal::from(values.len())
}

/// Population standard deviation; 0 for fewer than two values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their index
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);
    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// `part / total * 100`, or 0 when the total is zero
pub fn percentage(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    to_f64(part) / to_f64(total) * 100.0
}

/// Relative change in percent, or 0 when there is no previous value
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}
