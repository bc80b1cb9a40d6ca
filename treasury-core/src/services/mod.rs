//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod analytics;
mod demo;
pub mod migration;
mod recommendation;
mod status;

pub use analytics::{AnalyticsService, AnalyticsSummary};
pub use demo::{DemoSeed, DemoService};
pub use migration::{MigrationResult, MigrationService};
pub use recommendation::{RecommendationReport, RecommendationService};
pub use status::{ClientSummary, DateRange, StatusService, StatusSummary};
