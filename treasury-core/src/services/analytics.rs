//! Analytics service - resolves clients, fetches rows, runs the engine
//!
//! Every public operation first resolves the client (`NotFound` when it
//! does not exist) and then fetches exactly the rows its aggregation needs.
//! Composite calls fan the independent fetches out concurrently.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analytics::benchmark::compute_benchmark;
use crate::analytics::cash_flow::compute_cash_flow;
use crate::analytics::category::compute_categories;
use crate::analytics::dashboard::compute_dashboard;
use crate::analytics::forecast::compute_forecast;
use crate::analytics::liquidity::compute_liquidity;
use crate::analytics::overview::compute_overview;
use crate::analytics::patterns::compute_patterns;
use crate::analytics::stats::to_f64;
use crate::analytics::trends::compute_trend;
use crate::analytics::vendor::compute_vendors;
use crate::analytics::{
    BenchmarkReport, CashFlowAnalysis, CategoryBreakdown, ClientMetrics, Dashboard,
    DashboardOptions, DateWindow, ExportFormat, Forecast, ForecastOptions, LiquiditySnapshot,
    Lookback, Overview, Period, PeriodBounds, ReportExport, SpendingPattern, TrendMetric,
    TrendSeries, VendorAnalysis,
};
use crate::config::AnalyticsConfig;
use crate::domain::result::{Error, Result};
use crate::domain::{Client, ClientAccount, Transaction, TransactionFilter, TransactionQuery};
use crate::ports::Repository;

/// Everything the summary endpoint returns, computed concurrently
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub client: Client,
    pub as_of: NaiveDate,
    pub overview: Overview,
    pub cash_flow: CashFlowAnalysis,
    pub categories: CategoryBreakdown,
    pub liquidity: LiquiditySnapshot,
    pub patterns: Vec<SpendingPattern>,
    pub inflow_trend: TrendSeries,
}

pub struct AnalyticsService {
    repository: Arc<dyn Repository>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(repository: Arc<dyn Repository>, config: AnalyticsConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub(crate) async fn require_client(&self, client_id: Uuid) -> Result<Client> {
        self.repository
            .get_client(client_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Client {} not found", client_id)))
    }

    async fn fetch(&self, client_id: Uuid, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let query = TransactionQuery::new(client_id, filter.clone());
        let rows = self.repository.get_transactions(&query).await?;
        debug!(%client_id, rows = rows.len(), "fetched transactions");
        Ok(rows)
    }

    /// Accounts held by the client, for picking an account filter
    pub async fn accounts(&self, client_id: Uuid) -> Result<Vec<ClientAccount>> {
        self.require_client(client_id).await?;
        self.repository.get_client_accounts(client_id).await
    }

    // === Single aggregations ===

    pub async fn overview(&self, client_id: Uuid, filter: &TransactionFilter) -> Result<Overview> {
        self.require_client(client_id).await?;
        self.load_overview(client_id, filter).await
    }

    pub async fn cash_flow(
        &self,
        client_id: Uuid,
        filter: &TransactionFilter,
        period: Period,
    ) -> Result<CashFlowAnalysis> {
        self.require_client(client_id).await?;
        self.load_cash_flow(client_id, filter, period).await
    }

    /// Category breakdown; trends need both date bounds on the filter
    pub async fn categories(
        &self,
        client_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<CategoryBreakdown> {
        self.require_client(client_id).await?;
        self.load_categories(client_id, filter).await
    }

    pub async fn vendors(&self, client_id: Uuid, filter: &TransactionFilter) -> Result<VendorAnalysis> {
        self.require_client(client_id).await?;
        let rows = self.fetch(client_id, filter).await?;
        Ok(compute_vendors(&rows, self.config.vendor_limit))
    }

    /// Liquidity over the most recent rows, ignoring any filter
    pub async fn liquidity(&self, client_id: Uuid) -> Result<LiquiditySnapshot> {
        self.require_client(client_id).await?;
        self.load_liquidity(client_id).await
    }

    pub async fn spending_patterns(&self, client_id: Uuid) -> Result<Vec<SpendingPattern>> {
        self.require_client(client_id).await?;
        self.load_patterns(client_id).await
    }

    pub async fn trends(
        &self,
        client_id: Uuid,
        metric: TrendMetric,
        lookback: Lookback,
        as_of: NaiveDate,
    ) -> Result<TrendSeries> {
        self.require_client(client_id).await?;
        self.load_trend(client_id, metric, lookback, as_of).await
    }

    /// Forecast from the client's full daily history
    pub async fn forecast(&self, client_id: Uuid, options: ForecastOptions) -> Result<Forecast> {
        self.require_client(client_id).await?;
        options.validate()?;
        let history = self.fetch(client_id, &TransactionFilter::default()).await?;
        let forecast = compute_forecast(&history, options, &self.config.forecast)?;
        debug!(
            %client_id,
            history_days = forecast.history_days,
            points = forecast.points.len(),
            "forecast computed"
        );
        Ok(forecast)
    }

    /// Compare all-time liquidity metrics with the client's industry segment
    pub async fn benchmark(&self, client_id: Uuid) -> Result<BenchmarkReport> {
        let client = self.require_client(client_id).await?;
        let all = TransactionFilter::default();
        let (overview, liquidity) = tokio::try_join!(
            self.load_overview(client_id, &all),
            self.load_liquidity(client_id),
        )?;

        let metrics = ClientMetrics {
            liquidity_ratio: overview.liquidity_ratio,
            avg_daily_balance: to_f64(overview.average_daily_balance),
            volatility: liquidity.volatility,
        };
        Ok(compute_benchmark(
            client.industry.as_deref(),
            client.business_segment.as_deref(),
            metrics,
            &self.config.benchmarks,
        ))
    }

    pub async fn dashboard(&self, client_id: Uuid, options: DashboardOptions) -> Result<Dashboard> {
        self.require_client(client_id).await?;

        let window = options.window();
        let current_filter = TransactionFilter::between(window.start, window.end);
        let comparison_filter = options
            .comparison_window()
            .map(|w| TransactionFilter::between(w.start, w.end));

        let (current, comparison) = tokio::try_join!(self.fetch(client_id, &current_filter), async {
            match &comparison_filter {
                Some(filter) => self.fetch(client_id, filter).await.map(Some),
                None => Ok(None),
            }
        })?;

        Ok(compute_dashboard(
            options,
            &current,
            comparison.as_deref(),
            &self.config,
        ))
    }

    // === Composite ===

    /// Overview, monthly cash flow, categories, liquidity, patterns and a
    /// 12-month inflow trend
    ///
    /// Sub-aggregations run concurrently; the first error wins.
    pub async fn summary(&self, client_id: Uuid, as_of: NaiveDate) -> Result<AnalyticsSummary> {
        let client = self.require_client(client_id).await?;
        let all = TransactionFilter::default();

        let (overview, cash_flow, categories, liquidity, patterns, inflow_trend) = tokio::try_join!(
            self.load_overview(client_id, &all),
            self.load_cash_flow(client_id, &all, Period::Monthly),
            self.load_categories(client_id, &all),
            self.load_liquidity(client_id),
            self.load_patterns(client_id),
            self.load_trend(client_id, TrendMetric::Inflow, Lookback::default(), as_of),
        )?;

        info!(%client_id, transactions = overview.transaction_count, "summary computed");

        Ok(AnalyticsSummary {
            client,
            as_of,
            overview,
            cash_flow,
            categories,
            liquidity,
            patterns,
            inflow_trend,
        })
    }

    /// Validate the export format and wrap the summary for download
    pub async fn prepare_export(
        &self,
        client_id: Uuid,
        format: &str,
        as_of: NaiveDate,
    ) -> Result<ReportExport<AnalyticsSummary>> {
        let format: ExportFormat = format.parse()?;
        let summary = self.summary(client_id, as_of).await?;
        Ok(ReportExport::new(client_id, format, summary))
    }

    // === Loaders (client already resolved) ===

    async fn load_overview(&self, client_id: Uuid, filter: &TransactionFilter) -> Result<Overview> {
        let rows = self.fetch(client_id, filter).await?;
        let bounds = PeriodBounds {
            start_date: filter.start_date,
            end_date: filter.end_date,
        };
        Ok(compute_overview(&rows, bounds, &self.config))
    }

    async fn load_cash_flow(
        &self,
        client_id: Uuid,
        filter: &TransactionFilter,
        period: Period,
    ) -> Result<CashFlowAnalysis> {
        let rows = self.fetch(client_id, filter).await?;
        let bounds = PeriodBounds {
            start_date: filter.start_date,
            end_date: filter.end_date,
        };
        Ok(compute_cash_flow(&rows, period, bounds))
    }

    async fn load_categories(
        &self,
        client_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<CategoryBreakdown> {
        let current = self.fetch(client_id, filter).await?;

        let Some(window) = DateWindow::from_bounds(PeriodBounds {
            start_date: filter.start_date,
            end_date: filter.end_date,
        }) else {
            return Ok(compute_categories(&current, None));
        };

        let previous_window = window.preceding();
        let previous_filter =
            filter.with_dates(Some(previous_window.start), Some(previous_window.end));
        let previous = self.fetch(client_id, &previous_filter).await?;

        Ok(compute_categories(
            &current,
            Some((&previous, PeriodBounds::from(previous_window))),
        ))
    }

    pub(crate) async fn load_liquidity(&self, client_id: Uuid) -> Result<LiquiditySnapshot> {
        let rows = self.load_recent(client_id).await?;
        Ok(compute_liquidity(&rows, &self.config.liquidity))
    }

    /// The most recent rows considered by liquidity analysis, newest first
    pub(crate) async fn load_recent(&self, client_id: Uuid) -> Result<Vec<Transaction>> {
        let query = TransactionQuery::most_recent(client_id, self.config.liquidity.lookback);
        self.repository.get_transactions(&query).await
    }

    async fn load_patterns(&self, client_id: Uuid) -> Result<Vec<SpendingPattern>> {
        let rows = self.fetch(client_id, &TransactionFilter::default()).await?;
        Ok(compute_patterns(&rows, &self.config.patterns))
    }

    async fn load_trend(
        &self,
        client_id: Uuid,
        metric: TrendMetric,
        lookback: Lookback,
        as_of: NaiveDate,
    ) -> Result<TrendSeries> {
        let window = lookback.window(as_of);
        let rows = self
            .fetch(client_id, &TransactionFilter::between(window.start, window.end))
            .await?;
        Ok(compute_trend(
            &rows,
            metric,
            lookback,
            window,
            self.config.trend_transactions_as_count,
        ))
    }

    pub(crate) async fn load_all_time_overview(&self, client_id: Uuid) -> Result<Overview> {
        self.load_overview(client_id, &TransactionFilter::default()).await
    }
}
