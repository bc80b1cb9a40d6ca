//! Analytics aggregation engine
//!
//! Pure, deterministic functions over a slice of transactions. Nothing here
//! touches storage: services fetch rows through the repository port and
//! hand them to these functions together with the `AnalyticsConfig`.

pub mod benchmark;
pub mod cash_flow;
pub mod category;
pub mod dashboard;
pub mod export;
pub mod forecast;
pub mod liquidity;
pub mod overview;
pub mod patterns;
pub mod period;
pub mod recommend;
pub mod stats;
pub mod trends;
pub mod vendor;

#[cfg(test)]
pub(crate) mod testing;

pub use benchmark::{BenchmarkReport, ClientMetrics, MetricComparison};
pub use cash_flow::{CashFlowAnalysis, PeriodBucket};
pub use category::{CategoryBreakdown, CategoryStat, CategoryTrend};
pub use dashboard::{Dashboard, DashboardOptions, Kpi, KpiTrend};
pub use export::{ExportFormat, ReportExport};
pub use forecast::{Forecast, ForecastOptions, ForecastPoint};
pub use liquidity::LiquiditySnapshot;
pub use overview::Overview;
pub use patterns::{Frequency, Seasonality, SpendingPattern};
pub use period::{CompareMode, DateRangeToken, DateWindow, Lookback, Period, PeriodBounds};
pub use recommend::{Priority, Recommendation};
pub use trends::{TrendMetric, TrendPoint, TrendSeries};
pub use vendor::{VendorAnalysis, VendorStat};
