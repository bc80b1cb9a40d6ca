//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false, ... },
//!   "analytics": { "overviewBalanceWindow": 30, "liquidity": { ... }, ... }
//! }
//! ```
//! Every analytics field has a default, so partial files are valid.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (tms demo on)
    /// 2. Environment variable TREASURY_DEMO_MODE (for CI/testing)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring malformed settings.json");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("TREASURY_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        raw.analytics.validate()?;

        Ok(Self {
            demo_mode,
            analytics: raw.analytics,
        })
    }

    /// Save config to the data directory
    /// Preserves app settings the CLI doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.analytics = self.analytics.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// Database file name for the active mode
    pub fn db_filename(&self) -> &'static str {
        if self.demo_mode {
            "demo.duckdb"
        } else {
            "treasury.duckdb"
        }
    }
}

/// Thresholds and reference data consumed by the analytics engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    /// Number of most recent transactions averaged for the daily balance
    pub overview_balance_window: usize,
    /// Share of period outflow treated as required operating cash
    pub required_cash_buffer: Decimal,
    /// Maximum vendors returned by vendor analysis
    pub vendor_limit: usize,
    /// Count rows for the `transactions` trend metric instead of summing inflow and outflow
    pub trend_transactions_as_count: bool,
    pub liquidity: LiquidityConfig,
    pub patterns: PatternConfig,
    pub forecast: ForecastConfig,
    pub recommendations: RecommendationConfig,
    pub benchmarks: BenchmarkTable,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            overview_balance_window: 30,
            required_cash_buffer: Decimal::new(10, 2),
            vendor_limit: 50,
            trend_transactions_as_count: false,
            liquidity: LiquidityConfig::default(),
            patterns: PatternConfig::default(),
            forecast: ForecastConfig::default(),
            recommendations: RecommendationConfig::default(),
            benchmarks: BenchmarkTable::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Reject thresholds the engine cannot work with
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |msg: &str| Err(Error::Config(msg.to_string()));

        if self.overview_balance_window == 0 {
            return invalid("analytics.overviewBalanceWindow must be at least 1");
        }
        if self.required_cash_buffer < Decimal::ZERO || self.required_cash_buffer > Decimal::ONE {
            return invalid("analytics.requiredCashBuffer must be between 0 and 1");
        }
        if self.liquidity.lookback == 0 {
            return invalid("analytics.liquidity.lookback must be at least 1");
        }
        if self.forecast.trailing_window == 0 {
            return invalid("analytics.forecast.trailingWindow must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.forecast.confidence_floor) {
            return invalid("analytics.forecast.confidenceFloor must be between 0 and 1");
        }
        Ok(())
    }
}

/// Liquidity scoring thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiquidityConfig {
    /// Number of most recent transactions considered
    pub lookback: usize,
    /// Mean daily balance above which a quiet day counts as idle
    pub idle_balance_threshold: Decimal,
    /// Total daily activity below which a day counts as quiet
    pub idle_activity_threshold: Decimal,
    /// Minimum balance below which the low-balance flag is raised
    pub low_balance_threshold: Decimal,
    pub base_score: i32,
    pub strong_balance: Decimal,
    pub healthy_balance: Decimal,
    pub weak_balance: Decimal,
    pub low_volatility: f64,
    pub high_volatility: f64,
    pub many_idle_days: usize,
    pub few_idle_days: usize,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            lookback: 90,
            idle_balance_threshold: Decimal::new(50_000, 0),
            idle_activity_threshold: Decimal::new(1_000, 0),
            low_balance_threshold: Decimal::new(25_000, 0),
            base_score: 5,
            strong_balance: Decimal::new(100_000, 0),
            healthy_balance: Decimal::new(50_000, 0),
            weak_balance: Decimal::new(10_000, 0),
            low_volatility: 0.1,
            high_volatility: 0.5,
            many_idle_days: 10,
            few_idle_days: 3,
        }
    }
}

/// Spending-pattern classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternConfig {
    /// More transactions than this is "high" frequency
    pub high_frequency: usize,
    /// More transactions than this is "medium" frequency
    pub medium_frequency: usize,
    /// Vendors listed per category
    pub vendor_limit: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            high_frequency: 30,
            medium_frequency: 10,
            vendor_limit: 5,
        }
    }
}

/// Forecast heuristic parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    /// Daily buckets of history required before forecasting
    pub min_history_days: usize,
    /// Trailing buckets used for means and trend slopes
    pub trailing_window: usize,
    pub weekly_amplitude: f64,
    pub monthly_amplitude: f64,
    /// Confidence lost across the whole horizon
    pub confidence_decay: f64,
    pub confidence_floor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_history_days: 30,
            trailing_window: 30,
            weekly_amplitude: 0.1,
            monthly_amplitude: 0.05,
            confidence_decay: 0.3,
            confidence_floor: 0.5,
        }
    }
}

/// Recommendation rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationConfig {
    /// Annual yield assumed for swept idle cash
    pub sweep_yield: Decimal,
    /// Annual yield assumed for money market balances
    pub money_market_yield: Decimal,
    /// Average balance above which a money market fund is suggested
    pub money_market_min_balance: Decimal,
    /// Check payments (within the liquidity lookback) that trigger payment recommendations
    pub check_volume_threshold: usize,
    /// Per-item saving from converting a check to ACH
    pub check_conversion_saving: Decimal,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            sweep_yield: Decimal::new(45, 3),
            money_market_yield: Decimal::new(50, 3),
            money_market_min_balance: Decimal::new(250_000, 0),
            check_volume_threshold: 10,
            check_conversion_saving: Decimal::new(300, 2),
        }
    }
}

/// Reference liquidity values for an industry segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub liquidity_ratio: f64,
    pub avg_daily_balance: f64,
    pub volatility: f64,
}

/// A benchmark row keyed by industry and business segment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    pub industry: String,
    pub segment: String,
    #[serde(flatten)]
    pub benchmark: Benchmark,
}

/// Static benchmark table with a fallback row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTable {
    pub entries: Vec<IndustryBenchmark>,
    pub fallback: Benchmark,
}

impl BenchmarkTable {
    /// Look up the benchmark for an industry/segment pair
    ///
    /// Keys compare case-insensitively with spaces and hyphens treated as
    /// underscores. Returns the fallback row and `false` when unmatched.
    pub fn lookup(&self, industry: Option<&str>, segment: Option<&str>) -> (Benchmark, bool) {
        let (Some(industry), Some(segment)) = (industry, segment) else {
            return (self.fallback, false);
        };
        let industry = normalize_key(industry);
        let segment = normalize_key(segment);
        self.entries
            .iter()
            .find(|e| normalize_key(&e.industry) == industry && normalize_key(&e.segment) == segment)
            .map(|e| (e.benchmark, true))
            .unwrap_or((self.fallback, false))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        let rows: [(&str, &str, f64, f64, f64); 11] = [
            ("technology", "enterprise", 2.5, 5_000_000.0, 0.15),
            ("technology", "middle_market", 2.0, 1_500_000.0, 0.20),
            ("technology", "small_business", 1.5, 250_000.0, 0.30),
            ("manufacturing", "enterprise", 1.8, 3_000_000.0, 0.20),
            ("manufacturing", "middle_market", 1.5, 1_000_000.0, 0.25),
            ("manufacturing", "small_business", 1.2, 150_000.0, 0.35),
            ("healthcare", "enterprise", 2.2, 4_000_000.0, 0.15),
            ("healthcare", "middle_market", 1.8, 1_200_000.0, 0.20),
            ("healthcare", "small_business", 1.4, 200_000.0, 0.30),
            ("retail", "middle_market", 1.2, 800_000.0, 0.35),
            ("retail", "small_business", 1.0, 100_000.0, 0.40),
        ];
        Self {
            entries: rows
                .iter()
                .map(|(industry, segment, ratio, balance, volatility)| IndustryBenchmark {
                    industry: industry.to_string(),
                    segment: segment.to_string(),
                    benchmark: Benchmark {
                        liquidity_ratio: *ratio,
                        avg_daily_balance: *balance,
                        volatility: *volatility,
                    },
                })
                .collect(),
            fallback: Benchmark {
                liquidity_ratio: 1.5,
                avg_daily_balance: 500_000.0,
                volatility: 0.25,
            },
        }
    }
}
