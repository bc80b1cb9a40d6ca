//! Recommendation service - treasury product suggestions for a client

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::analytics::liquidity::compute_liquidity;
use crate::analytics::recommend::{recommend, RecommendationInputs};
use crate::analytics::vendor::group_vendors;
use crate::analytics::Recommendation;
use crate::domain::result::Result;
use crate::domain::TransactionType;

use super::AnalyticsService;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub client_id: Uuid,
    pub client_name: String,
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
}

pub struct RecommendationService {
    analytics: Arc<AnalyticsService>,
}

impl RecommendationService {
    pub fn new(analytics: Arc<AnalyticsService>) -> Self {
        Self { analytics }
    }

    /// Score every product rule against the client's activity
    ///
    /// The overview covers all history; liquidity, vendor analysis, check
    /// volume and the activity span come from the most recent liquidity
    /// lookback rows.
    pub async fn recommend(&self, client_id: Uuid) -> Result<RecommendationReport> {
        let client = self.analytics.require_client(client_id).await?;
        let (overview, recent) = tokio::try_join!(
            self.analytics.load_all_time_overview(client_id),
            self.analytics.load_recent(client_id),
        )?;

        let config = self.analytics.config();
        let liquidity = compute_liquidity(&recent, &config.liquidity);
        let check_payments = recent
            .iter()
            .filter(|tx| tx.is_outflow() && tx.transaction_type == TransactionType::Check)
            .count();
        let check_vendors = group_vendors(&recent, None)
            .iter()
            .filter(|v| v.payment_methods.contains(&TransactionType::Check))
            .count();
        let activity_days = match (
            recent.iter().map(|tx| tx.date).min(),
            recent.iter().map(|tx| tx.date).max(),
        ) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        };

        let inputs = RecommendationInputs {
            overview,
            liquidity,
            check_payments,
            check_vendors,
            activity_days,
        };
        let recommendations = recommend(&inputs, &config.recommendations, &config.liquidity);
        debug!(%client_id, count = recommendations.len(), "recommendations scored");

        Ok(RecommendationReport {
            client_id,
            client_name: client.name,
            generated_at: Utc::now(),
            recommendations,
        })
    }
}
