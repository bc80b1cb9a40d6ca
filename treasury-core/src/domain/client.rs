//! Client domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business client managed by a relationship manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    /// Industry used for benchmark lookup (e.g. "technology", "healthcare")
    pub industry: Option<String>,
    /// Business segment used for benchmark lookup (e.g. "enterprise", "small_business")
    pub business_segment: Option<String>,
    pub relationship_manager: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a new client with required fields
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            industry: None,
            business_segment: None,
            relationship_manager: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style industry/segment setter
    pub fn with_profile(mut self, industry: impl Into<String>, segment: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self.business_segment = Some(segment.into());
        self
    }

    /// Validate client data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("client name cannot be empty");
        }
        Ok(())
    }
}

/// A bank account held by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccount {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    /// Freeform account type: "operating", "payroll", "reserve", ...
    pub account_type: Option<String>,
    pub bank_name: Option<String>,
    /// ISO 4217 currency code, normalized to uppercase
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl ClientAccount {
    pub fn new(id: Uuid, client_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            client_id,
            name: name.into(),
            account_type: None,
            bank_name: None,
            currency: "USD".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Normalize currency code to uppercase
    pub fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }
}
