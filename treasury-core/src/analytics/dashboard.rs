//! Dashboard composition: overview, cash flow and categories for a relative
//! date range, with KPIs compared against an optional second window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cash_flow::{compute_cash_flow, CashFlowAnalysis};
use super::category::{compute_categories, CategoryBreakdown};
use super::overview::{compute_overview, Overview};
use super::period::{CompareMode, DateRangeToken, DateWindow, PeriodBounds};
use super::stats::to_f64;
use crate::config::AnalyticsConfig;
use crate::domain::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Up,
    Down,
    Stable,
}

impl KpiTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiTrend::Up => "up",
            KpiTrend::Down => "down",
            KpiTrend::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub comparison_value: Option<f64>,
    pub change_percent: f64,
    pub trend: KpiTrend,
}

impl Kpi {
    fn new(key: &str, label: &str, value: f64, comparison_value: Option<f64>) -> Self {
        let (change_percent, trend) = match comparison_value {
            Some(previous) => {
                let change = (value - previous) / previous.abs().max(1.0) * 100.0;
                let trend = if value > previous {
                    KpiTrend::Up
                } else if value < previous {
                    KpiTrend::Down
                } else {
                    KpiTrend::Stable
                };
                (change, trend)
            }
            None => (0.0, KpiTrend::Stable),
        };
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
            comparison_value,
            change_percent,
            trend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    pub date_range: DateRangeToken,
    pub compare_mode: CompareMode,
    pub as_of: NaiveDate,
}

impl DashboardOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            date_range: DateRangeToken::default(),
            compare_mode: CompareMode::default(),
            as_of,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.date_range.resolve(self.as_of)
    }

    pub fn comparison_window(&self) -> Option<DateWindow> {
        self.compare_mode.comparison_window(self.window())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date_range: DateRangeToken,
    pub compare_mode: CompareMode,
    pub period: PeriodBounds,
    pub comparison_period: Option<PeriodBounds>,
    pub kpis: Vec<Kpi>,
    pub overview: Overview,
    pub comparison_overview: Option<Overview>,
    pub cash_flow: CashFlowAnalysis,
    pub categories: CategoryBreakdown,
}

fn build_kpis(current: &Overview, comparison: Option<&Overview>) -> Vec<Kpi> {
    let pick = |f: fn(&Overview) -> f64| (f(current), comparison.map(f));

    let kpis: [(&str, &str, fn(&Overview) -> f64); 6] = [
        ("netCashFlow", "Net Cash Flow", |o| to_f64(o.net_cash_flow)),
        ("averageDailyBalance", "Average Daily Balance", |o| {
            to_f64(o.average_daily_balance)
        }),
        ("liquidityRatio", "Liquidity Ratio", |o| o.liquidity_ratio),
        ("totalInflow", "Total Inflow", |o| to_f64(o.total_inflow)),
        ("totalOutflow", "Total Outflow", |o| to_f64(o.total_outflow)),
        ("transactionCount", "Transactions", |o| o.transaction_count as f64),
    ];

    kpis
        .into_iter()
        .map(|(key, label, f)| {
            let (value, comparison_value) = pick(f);
            Kpi::new(key, label, value, comparison_value)
        })
        .collect()
}

/// Compose the dashboard
///
/// `current` holds the transactions inside `options.window()`; `comparison`
/// those inside the comparison window when one applies. Category trends
/// are measured against the comparison window.
pub fn compute_dashboard(
    options: DashboardOptions,
    current: &[Transaction],
    comparison: Option<&[Transaction]>,
    config: &AnalyticsConfig,
) -> Dashboard {
    let period = PeriodBounds::from(options.window());
    let comparison_period = options.comparison_window().map(PeriodBounds::from);

    let overview = compute_overview(current, period, config);
    let comparison_overview = match (comparison, comparison_period) {
        (Some(txs), Some(bounds)) => Some(compute_overview(txs, bounds, config)),
        _ => None,
    };

    let previous_categories = match (comparison, comparison_period) {
        (Some(txs), Some(bounds)) => Some((txs, bounds)),
        _ => None,
    };

    Dashboard {
        date_range: options.date_range,
        compare_mode: options.compare_mode,
        period,
        comparison_period,
        kpis: build_kpis(&overview, comparison_overview.as_ref()),
        cash_flow: compute_cash_flow(current, options.date_range.bucket_period(), period),
        categories: compute_categories(current, previous_categories),
        overview,
        comparison_overview,
    }
}
