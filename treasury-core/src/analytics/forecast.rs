//! Heuristic cash-flow forecast
//!
//! Extrapolates trailing daily means along their least-squares trend and
//! overlays a fixed weekly and monthly ripple. This is not a statistical
//! model: there is no fitted seasonality and confidence is a linear decay.

use std::f64::consts::PI;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::cash_flow::bucket_transactions;
use super::period::Period;
use super::stats::{mean, ols_slope, to_f64};
use crate::config::ForecastConfig;
use crate::domain::result::{Error, Result};
use crate::domain::Transaction;

/// Request parameters for a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOptions {
    pub days: u32,
    pub confidence: f64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            days: 30,
            confidence: 0.95,
        }
    }
}

impl ForecastOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=365).contains(&self.days) {
            return Err(Error::bad_request(format!(
                "Forecast days must be between 1 and 365, got {}",
                self.days
            )));
        }
        if !(0.1..=1.0).contains(&self.confidence) {
            return Err(Error::bad_request(format!(
                "Confidence must be between 0.1 and 1.0, got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_inflow: f64,
    pub predicted_outflow: f64,
    pub predicted_balance: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub points: Vec<ForecastPoint>,
    /// Daily buckets of history available
    pub history_days: usize,
    pub sufficient_history: bool,
    pub average_daily_inflow: f64,
    pub average_daily_outflow: f64,
    pub inflow_trend: f64,
    pub outflow_trend: f64,
    pub starting_balance: f64,
}

impl Forecast {
    fn insufficient(history_days: usize) -> Self {
        Self {
            points: Vec::new(),
            history_days,
            sufficient_history: false,
            average_daily_inflow: 0.0,
            average_daily_outflow: 0.0,
            inflow_trend: 0.0,
            outflow_trend: 0.0,
            starting_balance: 0.0,
        }
    }
}

fn seasonal_factor(d: f64, config: &ForecastConfig) -> f64 {
    1.0 + config.weekly_amplitude * (2.0 * PI * d / 7.0).sin()
        + config.monthly_amplitude * (2.0 * PI * d / 30.0).sin()
}

/// Forecast `options.days` days past the last transaction in `history`
///
/// Options are validated first; too little history yields an empty forecast.
pub fn compute_forecast(
    history: &[Transaction],
    options: ForecastOptions,
    config: &ForecastConfig,
) -> Result<Forecast> {
    options.validate()?;

    let buckets = bucket_transactions(history, Period::Daily);
    let Some(last_date) = history.iter().map(|tx| tx.date).max() else {
        return Ok(Forecast::insufficient(0));
    };
    if buckets.len() < config.min_history_days {
        return Ok(Forecast::insufficient(buckets.len()));
    }

    let trailing = &buckets[buckets.len().saturating_sub(config.trailing_window)..];
    let inflows: Vec<f64> = trailing.iter().map(|b| to_f64(b.inflow)).collect();
    let outflows: Vec<f64> = trailing.iter().map(|b| to_f64(b.outflow)).collect();

    let average_daily_inflow = mean(&inflows);
    let average_daily_outflow = mean(&outflows);
    let inflow_trend = ols_slope(&inflows);
    let outflow_trend = ols_slope(&outflows);
    let starting_balance = buckets.last().map(|b| to_f64(b.balance)).unwrap_or(0.0);

    let horizon = options.days as f64;
    let mut balance = starting_balance;
    let points = (1..=options.days)
        .map(|day| {
            let d = day as f64;
            let seasonal = seasonal_factor(d, config);
            let predicted_inflow = ((average_daily_inflow + inflow_trend * d) * seasonal).max(0.0);
            let predicted_outflow = ((average_daily_outflow + outflow_trend * d) * seasonal).max(0.0);
            balance += predicted_inflow - predicted_outflow;

            let confidence =
                (options.confidence - d / horizon * config.confidence_decay).max(config.confidence_floor);

            ForecastPoint {
                date: last_date + Duration::days(day as i64),
                predicted_inflow,
                predicted_outflow,
                predicted_balance: balance,
                confidence,
            }
        })
        .collect();

    Ok(Forecast {
        points,
        history_days: buckets.len(),
        sufficient_history: true,
        average_daily_inflow,
        average_daily_outflow,
        inflow_trend,
        outflow_trend,
        starting_balance,
    })
}
