//! Industry benchmarking
//!
//! The percentile rank is a weighted heuristic, not a population
//! percentile: each factor earns 10, 15, 20 or 25 points depending on how
//! the client compares with the benchmark, and the mean is scaled to 0-100.

use serde::{Deserialize, Serialize};

use crate::config::{Benchmark, BenchmarkTable};

const MAX_FACTOR_SCORE: f64 = 25.0;

/// The client's side of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetrics {
    pub liquidity_ratio: f64,
    pub avg_daily_balance: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub metric: String,
    pub client_value: f64,
    pub benchmark_value: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub industry: Option<String>,
    pub business_segment: Option<String>,
    /// False when the fallback row was used
    pub matched_benchmark: bool,
    pub client: ClientMetrics,
    pub benchmark: Benchmark,
    pub comparisons: Vec<MetricComparison>,
    pub percentile_rank: f64,
}

/// Points for a client/benchmark ratio
fn ladder(ratio: f64) -> f64 {
    if ratio >= 1.5 {
        25.0
    } else if ratio >= 1.0 {
        20.0
    } else if ratio >= 0.5 {
        15.0
    } else {
        10.0
    }
}

/// Higher is better
fn score_higher(client: f64, benchmark: f64) -> f64 {
    if benchmark <= 0.0 {
        return ladder(1.0);
    }
    ladder(client / benchmark)
}

/// Lower is better; a client with no volatility earns full points
fn score_lower(client: f64, benchmark: f64) -> f64 {
    if client <= 0.0 {
        return MAX_FACTOR_SCORE;
    }
    if benchmark <= 0.0 {
        return ladder(1.0);
    }
    ladder(benchmark / client)
}

pub fn compute_benchmark(
    industry: Option<&str>,
    business_segment: Option<&str>,
    client: ClientMetrics,
    table: &BenchmarkTable,
) -> BenchmarkReport {
    let (benchmark, matched_benchmark) = table.lookup(industry, business_segment);

    let comparisons = vec![
        MetricComparison {
            metric: "liquidityRatio".to_string(),
            client_value: client.liquidity_ratio,
            benchmark_value: benchmark.liquidity_ratio,
            score: score_higher(client.liquidity_ratio, benchmark.liquidity_ratio),
        },
        MetricComparison {
            metric: "avgDailyBalance".to_string(),
            client_value: client.avg_daily_balance,
            benchmark_value: benchmark.avg_daily_balance,
            score: score_higher(client.avg_daily_balance, benchmark.avg_daily_balance),
        },
        MetricComparison {
            metric: "volatility".to_string(),
            client_value: client.volatility,
            benchmark_value: benchmark.volatility,
            score: score_lower(client.volatility, benchmark.volatility),
        },
    ];

    let mean_score = comparisons.iter().map(|c| c.score).sum::<f64>() / comparisons.len() as f64;
    let percentile_rank = (mean_score / MAX_FACTOR_SCORE * 100.0).clamp(0.0, 100.0);

    BenchmarkReport {
        industry: industry.map(str::to_string),
        business_segment: business_segment.map(str::to_string),
        matched_benchmark,
        client,
        benchmark,
        comparisons,
        percentile_rank,
    }
}
