//! Month-over-month trend series for a single metric

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cash_flow::{bucket_transactions, PeriodBucket};
use super::period::{DateWindow, Lookback, Period};
use super::stats::{percent_change, to_f64};
use crate::domain::result::Error;
use crate::domain::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    Inflow,
    Outflow,
    Balance,
    Transactions,
}

impl TrendMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendMetric::Inflow => "inflow",
            TrendMetric::Outflow => "outflow",
            TrendMetric::Balance => "balance",
            TrendMetric::Transactions => "transactions",
        }
    }

    /// Value of this metric for one bucket
    ///
    /// `transactions` is inflow plus outflow volume unless `count_rows` asks
    /// for the number of rows in the bucket.
    fn value(&self, bucket: &PeriodBucket, count_rows: bool) -> f64 {
        match self {
            TrendMetric::Inflow => to_f64(bucket.inflow),
            TrendMetric::Outflow => to_f64(bucket.outflow),
            TrendMetric::Balance => to_f64(bucket.balance),
            TrendMetric::Transactions if count_rows => bucket.transaction_count as f64,
            TrendMetric::Transactions => to_f64(bucket.inflow + bucket.outflow),
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inflow" => Ok(TrendMetric::Inflow),
            "outflow" => Ok(TrendMetric::Outflow),
            "balance" => Ok(TrendMetric::Balance),
            "transactions" => Ok(TrendMetric::Transactions),
            other => Err(Error::bad_request(format!(
                "Invalid metric '{}': expected inflow, outflow, balance or transactions",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Monthly bucket key, `YYYY-MM`
    pub period: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub metric: TrendMetric,
    pub lookback: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub points: Vec<TrendPoint>,
}

/// Build the series from the transactions inside `window`
pub fn compute_trend(
    transactions: &[Transaction],
    metric: TrendMetric,
    lookback: Lookback,
    window: DateWindow,
    count_rows: bool,
) -> TrendSeries {
    let buckets = bucket_transactions(transactions, Period::Monthly);

    let mut points = Vec::with_capacity(buckets.len());
    let mut previous: Option<f64> = None;
    for bucket in &buckets {
        let value = metric.value(bucket, count_rows);
        let (change, change_percent) = match previous {
            Some(prev) => (value - prev, percent_change(value, prev)),
            None => (0.0, 0.0),
        };
        points.push(TrendPoint {
            period: bucket.period_key.clone(),
            value,
            change,
            change_percent,
        });
        previous = Some(value);
    }

    TrendSeries {
        metric,
        lookback: lookback.to_string(),
        start_date: window.start,
        end_date: window.end,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{date, tx};

    fn sample() -> Vec<Transaction> {
        vec![
            tx(100, date(2025, 1, 5)),
            tx(-40, date(2025, 1, 6)),
            tx(150, date(2025, 2, 5)),
            tx(-10, date(2025, 3, 5)),
        ]
    }

    fn window() -> DateWindow {
        Lookback::months(3).window(date(2025, 3, 31))
    }

    #[test]
    fn test_inflow_series_changes() {
        let series = compute_trend(&sample(), TrendMetric::Inflow, Lookback::months(3), window(), false);

        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![100.0, 150.0, 0.0]);
        assert_eq!(series.points[0].change, 0.0);
        assert_eq!(series.points[0].change_percent, 0.0);
        assert_eq!(series.points[1].change, 50.0);
        assert_eq!(series.points[1].change_percent, 50.0);
        assert_eq!(series.points[2].change_percent, -100.0);
        assert_eq!(series.lookback, "3m");
        assert_eq!(series.start_date, date(2024, 12, 31));
    }

    #[test]
    fn test_change_percent_guards_zero_previous() {
        let series = compute_trend(&sample(), TrendMetric::Outflow, Lookback::months(3), window(), false);
        // February has no outflow
        assert_eq!(series.points[1].value, 0.0);
        assert_eq!(series.points[2].change, 10.0);
        assert_eq!(series.points[2].change_percent, 0.0);
    }

    #[test]
    fn test_transactions_metric_modes() {
        let proxy = compute_trend(&sample(), TrendMetric::Transactions, Lookback::months(3), window(), false);
        assert_eq!(proxy.points[0].value, 140.0);

        let counted = compute_trend(&sample(), TrendMetric::Transactions, Lookback::months(3), window(), true);
        assert_eq!(counted.points[0].value, 2.0);
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("Balance".parse::<TrendMetric>().unwrap(), TrendMetric::Balance);
        assert!(matches!("volume".parse::<TrendMetric>(), Err(Error::BadRequest(_))));
    }
}
