//! Rule-based treasury product recommendations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::liquidity::LiquiditySnapshot;
use super::overview::Overview;
use super::stats::to_f64;
use crate::config::{LiquidityConfig, RecommendationConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Priority::High
        } else if score >= 50.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_code: String,
    pub product_name: String,
    /// 0-100
    pub score: f64,
    pub priority: Priority,
    pub rationale: String,
    pub estimated_annual_benefit: Option<Decimal>,
}

impl Recommendation {
    fn new(code: &str, name: &str, score: f64, rationale: String, benefit: Option<Decimal>) -> Self {
        let score = score.clamp(0.0, 100.0);
        Self {
            product_code: code.to_string(),
            product_name: name.to_string(),
            score,
            priority: Priority::from_score(score),
            rationale,
            estimated_annual_benefit: benefit.map(|b| b.round_dp(2)),
        }
    }
}

/// Aggregates the rules read
#[derive(Debug, Clone)]
pub struct RecommendationInputs {
    pub overview: Overview,
    pub liquidity: LiquiditySnapshot,
    /// Check payments among the liquidity lookback rows
    pub check_payments: usize,
    /// Vendors paid by check at least once, from vendor analysis of the same rows
    pub check_vendors: usize,
    /// Calendar days spanned by those rows
    pub activity_days: i64,
}

fn sweep(inputs: &RecommendationInputs, config: &RecommendationConfig) -> Option<Recommendation> {
    let idle = inputs.overview.idle_balance;
    if idle <= Decimal::ZERO {
        return None;
    }
    let score = (40.0 + 5.0 * inputs.liquidity.idle_days as f64).min(95.0);
    Some(Recommendation::new(
        "SWEEP",
        "Investment Sweep Account",
        score,
        format!(
            "{} of balance sits above the operating buffer across {} idle days",
            idle.round_dp(2),
            inputs.liquidity.idle_days
        ),
        Some(idle * config.sweep_yield),
    ))
}

fn money_market(inputs: &RecommendationInputs, config: &RecommendationConfig) -> Option<Recommendation> {
    let average = inputs.liquidity.average_balance;
    let minimum = config.money_market_min_balance;
    if minimum <= Decimal::ZERO || average < minimum {
        return None;
    }
    let excess_ratio = to_f64(average) / to_f64(minimum) - 1.0;
    let score = (60.0 + 10.0 * excess_ratio).min(95.0);
    Some(Recommendation::new(
        "MMF",
        "Money Market Fund",
        score,
        format!("Average balance of {} exceeds {}", average, minimum),
        Some((average - minimum) * config.money_market_yield),
    ))
}

fn credit_line(inputs: &RecommendationInputs) -> Option<Recommendation> {
    let liquidity = &inputs.liquidity;
    if liquidity.transactions_analyzed == 0 {
        return None;
    }
    let weak_score = liquidity.liquidity_score < 4;
    let (score, rationale) = match (liquidity.threshold_exceeded, weak_score) {
        (true, true) => (
            90.0,
            format!(
                "Balance dipped to {} with a liquidity score of {}",
                liquidity.minimum_balance, liquidity.liquidity_score
            ),
        ),
        (true, false) => (
            75.0,
            format!(
                "Balance dipped to {}, below {}",
                liquidity.minimum_balance, liquidity.threshold_amount
            ),
        ),
        (false, true) => (
            60.0,
            format!("Liquidity score of {} leaves little cushion", liquidity.liquidity_score),
        ),
        (false, false) => return None,
    };
    Some(Recommendation::new(
        "LOC",
        "Revolving Line of Credit",
        score,
        rationale,
        None,
    ))
}

fn positive_pay(inputs: &RecommendationInputs, config: &RecommendationConfig) -> Option<Recommendation> {
    let checks = inputs.check_payments;
    if checks == 0 || checks < config.check_volume_threshold {
        return None;
    }
    Some(Recommendation::new(
        "POSPAY",
        "Positive Pay",
        (50.0 + 2.0 * checks as f64).min(95.0),
        format!("{} check payments exposed to check fraud", checks),
        None,
    ))
}

fn ach_origination(inputs: &RecommendationInputs, config: &RecommendationConfig) -> Option<Recommendation> {
    let checks = inputs.check_payments;
    if checks == 0 || checks < config.check_volume_threshold {
        return None;
    }
    let span = Decimal::from(inputs.activity_days.max(1));
    let annual_items = Decimal::from(checks) * Decimal::from(365) / span;
    Some(Recommendation::new(
        "ACH",
        "ACH Origination",
        (40.0 + 2.0 * checks as f64).min(90.0),
        format!(
            "{} check payments to {} could move to ACH",
            checks,
            match inputs.check_vendors {
                0 | 1 => "one vendor".to_string(),
                n => format!("{} vendors", n),
            }
        ),
        Some(annual_items * config.check_conversion_saving),
    ))
}

fn cash_forecasting(inputs: &RecommendationInputs, liquidity: &LiquidityConfig) -> Option<Recommendation> {
    let volatility = inputs.liquidity.volatility;
    if volatility <= liquidity.high_volatility {
        return None;
    }
    Some(Recommendation::new(
        "FORECAST",
        "Cash Forecasting",
        (50.0 + (volatility - liquidity.high_volatility) * 100.0).min(85.0),
        format!("Balance volatility of {:.2} makes cash positioning hard", volatility),
        None,
    ))
}

/// Evaluate every rule, highest score first
pub fn recommend(
    inputs: &RecommendationInputs,
    config: &RecommendationConfig,
    liquidity: &LiquidityConfig,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = [
        sweep(inputs, config),
        money_market(inputs, config),
        credit_line(inputs),
        positive_pay(inputs, config),
        ach_origination(inputs, config),
        cash_forecasting(inputs, liquidity),
    ]
    .into_iter()
    .flatten()
    .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.product_code.cmp(&b.product_code))
    });
    recommendations
}
