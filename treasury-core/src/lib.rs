//! Treasury Core - Analytics for treasury client management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Client, ClientAccount, Transaction)
//! - **ports**: Trait definitions for external dependencies (Repository)
//! - **analytics**: Pure aggregation engine over transaction slices
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, in-memory, demo data)

pub mod adapters;
pub mod analytics;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use config::AnalyticsConfig;
pub use domain::result::{Error, Result};
pub use domain::{Client, ClientAccount, Transaction, TransactionFilter, TransactionType};
pub use ports::Repository;

/// Main context for treasury operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct TreasuryContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub analytics_service: Arc<AnalyticsService>,
    pub recommendation_service: RecommendationService,
    pub status_service: StatusService,
}

impl TreasuryContext {
    /// Open the active database in `data_dir` and build the services
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(data_dir).context("Failed to load settings")?;

        let db_path = data_dir.join(config.db_filename());
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        let analytics_service = Arc::new(AnalyticsService::new(
            Arc::clone(&repository) as Arc<dyn Repository>,
            config.analytics.clone(),
        ));
        let recommendation_service = RecommendationService::new(Arc::clone(&analytics_service));
        let status_service = StatusService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            analytics_service,
            recommendation_service,
            status_service,
        })
    }
}
