//! Integration tests for treasury-core services
//!
//! These tests run the analytics services end to end against a real DuckDB
//! file seeded with the demo dataset.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use treasury_core::adapters::demo::{generate_demo_data, DemoDataset};
use treasury_core::adapters::duckdb::DuckDbRepository;
use treasury_core::analytics::{
    CategoryTrend, CompareMode, DashboardOptions, DateRangeToken, ForecastOptions, Lookback,
    Period, TrendMetric,
};
use treasury_core::config::AnalyticsConfig;
use treasury_core::services::{AnalyticsService, DemoService, RecommendationService};
use treasury_core::{
    Client, ClientAccount, Error, Repository, TransactionFilter, TransactionType, TreasuryContext,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

/// Seed the demo dataset ending on `as_of()`
fn seed_demo(repo: &DuckDbRepository) -> DemoDataset {
    let data = generate_demo_data(as_of());
    for client in &data.clients {
        repo.upsert_client(client).unwrap();
    }
    for account in &data.accounts {
        repo.upsert_account(account).unwrap();
    }
    repo.upsert_transactions(&data.transactions).unwrap();
    data
}

fn analytics(repo: &Arc<DuckDbRepository>) -> AnalyticsService {
    AnalyticsService::new(
        Arc::clone(repo) as Arc<dyn Repository>,
        AnalyticsConfig::default(),
    )
}

fn client_by_name<'a>(data: &'a DemoDataset, name: &str) -> &'a Client {
    data.clients.iter().find(|c| c.name == name).unwrap()
}

// ============================================================================
// Storage
// ============================================================================

#[tokio::test]
async fn test_transactions_round_trip_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);

    let client = &data.clients[0];
    let stored = repo
        .get_transactions(&treasury_core::domain::TransactionQuery::all(client.id))
        .await
        .unwrap();
    let expected: Vec<_> = data
        .transactions
        .iter()
        .filter(|t| t.client_id == client.id)
        .collect();

    assert_eq!(stored.len(), expected.len());
    let stored_total: Decimal = stored.iter().map(|t| t.amount).sum();
    let expected_total: Decimal = expected.iter().map(|t| t.amount).sum();
    assert_eq!(stored_total, expected_total);
    assert!(stored.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_sequential.duckdb");

    for _ in 0..5 {
        let repo = DuckDbRepository::new(&db_path).unwrap();
        repo.ensure_schema().unwrap();
    }

    let repo = DuckDbRepository::new(&db_path).unwrap();
    let result = repo.run_migrations().unwrap();
    assert!(result.applied.is_empty());
}

// ============================================================================
// Analytics over DuckDB
// ============================================================================

#[tokio::test]
async fn test_overview_scenario_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let client = Client::new(Uuid::new_v4(), "Scenario Co");
    let account = ClientAccount::new(Uuid::new_v4(), client.id, "Operating");
    repo.upsert_client(&client).unwrap();
    repo.upsert_account(&account).unwrap();
    let d1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
    let rows: Vec<_> = [(1000, d1), (-400, d1), (-100, d2)]
        .into_iter()
        .map(|(amount, date)| {
            treasury_core::Transaction::new(
                Uuid::new_v4(),
                client.id,
                account.id,
                Decimal::new(amount, 0),
                date,
                TransactionType::Ach,
            )
        })
        .collect();
    repo.upsert_transactions(&rows).unwrap();

    let overview = analytics(&repo)
        .overview(client.id, &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(overview.total_inflow, Decimal::new(1000, 0));
    assert_eq!(overview.total_outflow, Decimal::new(500, 0));
    assert_eq!(overview.net_cash_flow, Decimal::new(500, 0));
    assert_eq!(overview.transaction_count, 3);
    assert_eq!(overview.average_daily_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_net_cash_flow_identity_for_every_client() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);

    for client in &data.clients {
        let overview = service
            .overview(client.id, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(
            overview.total_inflow - overview.total_outflow,
            overview.net_cash_flow
        );
        assert!(overview.transaction_count > 0);
    }
}

#[tokio::test]
async fn test_cash_flow_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[1];

    let filter = TransactionFilter::between(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
    );
    let first = service.cash_flow(client.id, &filter, Period::Weekly).await.unwrap();
    let second = service.cash_flow(client.id, &filter, Period::Weekly).await.unwrap();

    assert_eq!(first.buckets, second.buckets);
    let keys: Vec<&str> = first.buckets.iter().map(|b| b.period_key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn test_category_percentages_sum_to_hundred() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[0];

    let filter = TransactionFilter::between(
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
    );
    let breakdown = service.categories(client.id, &filter).await.unwrap();
    let total: f64 = breakdown.categories.iter().map(|c| c.percentage).sum();
    assert!((total - 100.0).abs() < 0.01);
    assert!(breakdown.comparison_period.is_some());
    let payroll = breakdown
        .categories
        .iter()
        .find(|c| c.category == "Payroll")
        .unwrap();
    assert_ne!(payroll.trend, CategoryTrend::New);
}

#[tokio::test]
async fn test_manufacturer_vendors_are_check_heavy() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = client_by_name(&data, "Harbor Manufacturing Co");

    let vendors = service
        .vendors(client.id, &TransactionFilter::default())
        .await
        .unwrap();
    assert!(vendors.vendors.len() <= 50);
    let steel = vendors
        .vendors
        .iter()
        .find(|v| v.vendor_name == "Great Lakes Steel")
        .unwrap();
    assert!(steel.payment_methods.contains(&TransactionType::Check));
    assert!(vendors
        .vendors
        .windows(2)
        .all(|w| w[0].total_amount >= w[1].total_amount));
}

#[tokio::test]
async fn test_liquidity_and_benchmark_ranges() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);

    for client in &data.clients {
        let liquidity = service.liquidity(client.id).await.unwrap();
        assert!(liquidity.liquidity_score <= 10);
        assert_eq!(liquidity.transactions_analyzed, 90);

        let benchmark = service.benchmark(client.id).await.unwrap();
        assert!(benchmark.matched_benchmark);
        assert!((0.0..=100.0).contains(&benchmark.percentile_rank));
    }
}

#[tokio::test]
async fn test_forecast_over_demo_history() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[2];

    let forecast = service
        .forecast(
            client.id,
            ForecastOptions {
                days: 45,
                confidence: 0.9,
            },
        )
        .await
        .unwrap();
    assert!(forecast.sufficient_history);
    assert_eq!(forecast.points.len(), 45);
    assert!(forecast
        .points
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
    assert!(forecast.points.iter().all(|p| p.confidence >= 0.5));
    assert!(forecast.points.iter().all(|p| p.predicted_inflow >= 0.0));
}

#[tokio::test]
async fn test_trend_and_dashboard() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[0];

    let metric = TrendMetric::from_str("outflow").unwrap();
    let series = service
        .trends(client.id, metric, Lookback::months(3), as_of())
        .await
        .unwrap();
    assert!(!series.points.is_empty());
    assert_eq!(series.points[0].change, 0.0);

    let options = DashboardOptions {
        date_range: DateRangeToken::Last90Days,
        compare_mode: CompareMode::Previous,
        as_of: as_of(),
    };
    let dashboard = service.dashboard(client.id, options).await.unwrap();
    assert_eq!(dashboard.kpis.len(), 6);
    assert!(dashboard.comparison_overview.is_some());
}

#[tokio::test]
async fn test_invalid_parameters_are_bad_requests() {
    assert!(matches!(
        TrendMetric::from_str("profit"),
        Err(Error::BadRequest(_))
    ));
    assert!(matches!(Lookback::from_str("12"), Err(Error::BadRequest(_))));

    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[0];

    let too_confident = ForecastOptions {
        days: 30,
        confidence: 1.5,
    };
    assert!(matches!(
        service.forecast(client.id, too_confident).await,
        Err(Error::BadRequest(_))
    ));
    assert!(matches!(
        service.prepare_export(client.id, "txt", as_of()).await,
        Err(Error::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_unknown_client_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    seed_demo(&repo);
    let service = analytics(&repo);

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.overview(missing, &TransactionFilter::default()).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.summary(missing, as_of()).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_summaries_share_repository() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = Arc::new(analytics(&repo));

    let handles: Vec<_> = data
        .clients
        .iter()
        .map(|client| {
            let service = Arc::clone(&service);
            let id = client.id;
            tokio::spawn(async move { service.summary(id, as_of()).await })
        })
        .collect();

    for (handle, client) in handles.into_iter().zip(&data.clients) {
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.client.id, client.id);
        assert!(!summary.cash_flow.buckets.is_empty());
        assert!(!summary.patterns.is_empty());
    }
}

#[tokio::test]
async fn test_recommendations_for_demo_clients() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = RecommendationService::new(Arc::new(analytics(&repo)));

    let manufacturer = client_by_name(&data, "Harbor Manufacturing Co");
    let report = service.recommend(manufacturer.id).await.unwrap();
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.product_code == "POSPAY"));

    for client in &data.clients {
        let report = service.recommend(client.id).await.unwrap();
        assert!(report
            .recommendations
            .iter()
            .all(|r| (0.0..=100.0).contains(&r.score)));
    }
}

// ============================================================================
// Context and demo mode
// ============================================================================

#[tokio::test]
async fn test_context_opens_demo_database() {
    let temp_dir = TempDir::new().unwrap();
    DemoService::new(temp_dir.path()).enable().unwrap();

    let ctx = TreasuryContext::new(temp_dir.path()).unwrap();
    assert!(ctx.config.demo_mode);
    let status = ctx.status_service.get_status().unwrap();
    assert_eq!(status.total_clients, 3);

    let client_id = ctx.repository.query_clients().unwrap()[0].id;
    let overview = ctx
        .analytics_service
        .overview(client_id, &TransactionFilter::default())
        .await
        .unwrap();
    assert!(overview.transaction_count > 0);
}

#[tokio::test]
async fn test_accounts_feed_the_account_filter() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let data = seed_demo(&repo);
    let service = analytics(&repo);
    let client = &data.clients[0];

    let accounts = service.accounts(client.id).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].client_id, client.id);

    let by_account = TransactionFilter {
        account_id: Some(accounts[0].id),
        ..TransactionFilter::default()
    };
    let scoped = service.overview(client.id, &by_account).await.unwrap();
    let all = service
        .overview(client.id, &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(scoped.transaction_count, all.transaction_count);
    assert!(scoped.transaction_count > 0);
}

#[test]
fn test_context_rejects_unusable_settings() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{ "analytics": { "overviewBalanceWindow": 0 } }"#,
    )
    .unwrap();

    let err = TreasuryContext::new(temp_dir.path()).err().unwrap();
    assert!(err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<Error>(), Some(Error::Config(_)))));
}
