//! Category breakdown with period-over-period trend

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::PeriodBounds;
use super::stats::percentage;
use crate::domain::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTrend {
    Up,
    Down,
    Stable,
    /// No activity in the preceding window
    New,
}

impl CategoryTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTrend::Up => "up",
            CategoryTrend::Down => "down",
            CategoryTrend::Stable => "stable",
            CategoryTrend::New => "new",
        }
    }

    fn compare(current: Decimal, previous: Decimal) -> Self {
        if previous.is_zero() {
            CategoryTrend::New
        } else if current > previous {
            CategoryTrend::Up
        } else if current < previous {
            CategoryTrend::Down
        } else {
            CategoryTrend::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
    pub percentage: f64,
    pub trend: CategoryTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryStat>,
    pub total_amount: Decimal,
    /// Window the trends were computed against, if any
    pub comparison_period: Option<PeriodBounds>,
}

/// Sum of absolute amounts and row count per category label
pub fn group_by_category(transactions: &[Transaction]) -> HashMap<String, (Decimal, usize)> {
    let mut groups: HashMap<String, (Decimal, usize)> = HashMap::new();
    for tx in transactions {
        let entry = groups
            .entry(tx.category_label().to_string())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += tx.amount.abs();
        entry.1 += 1;
    }
    groups
}

/// Build the breakdown for `current`
///
/// `previous` holds the transactions of the preceding window together with
/// its bounds. Without one every trend is `stable`.
pub fn compute_categories(
    current: &[Transaction],
    previous: Option<(&[Transaction], PeriodBounds)>,
) -> CategoryBreakdown {
    let groups = group_by_category(current);
    let total_amount: Decimal = groups.values().map(|(amount, _)| *amount).sum();
    let previous_groups = previous.map(|(txs, _)| group_by_category(txs));

    let mut categories: Vec<CategoryStat> = groups
        .into_iter()
        .map(|(category, (amount, count))| {
            let trend = match &previous_groups {
                Some(prev) => {
                    let prev_amount = prev.get(&category).map(|(a, _)| *a).unwrap_or_default();
                    CategoryTrend::compare(amount, prev_amount)
                }
                None => CategoryTrend::Stable,
            };
            CategoryStat {
                percentage: percentage(amount, total_amount),
                category,
                amount,
                count,
                trend,
            }
        })
        .collect();

    categories.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    CategoryBreakdown {
        categories,
        total_amount,
        comparison_period: previous.map(|(_, bounds)| bounds),
    }
}
