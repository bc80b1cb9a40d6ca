//! Status service - store contents at a glance

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;

/// Status service for database summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let clients = self.repository.query_clients()?;
        let account_count = self.repository.get_account_count()?;
        let transaction_count = self.repository.get_transaction_count()?;
        let date_range = self.repository.get_transaction_date_range()?;

        Ok(StatusSummary {
            total_clients: clients.len() as i64,
            total_accounts: account_count,
            total_transactions: transaction_count,
            clients: clients
                .into_iter()
                .map(|c| ClientSummary {
                    id: c.id.to_string(),
                    name: c.name,
                    industry: c.industry,
                    business_segment: c.business_segment,
                })
                .collect(),
            date_range,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_clients: i64,
    pub total_accounts: i64,
    pub total_transactions: i64,
    pub clients: Vec<ClientSummary>,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    pub industry: Option<String>,
    pub business_segment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::{Client, ClientAccount, Transaction, TransactionType};

    fn repository() -> Arc<DuckDbRepository> {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        Arc::new(repo)
    }

    #[test]
    fn test_status_counts_and_range() {
        let repo = repository();
        let client = Client::new(Uuid::new_v4(), "Acme").with_profile("retail", "small_business");
        let account = ClientAccount::new(Uuid::new_v4(), client.id, "Operating");
        repo.upsert_client(&client).unwrap();
        repo.upsert_account(&account).unwrap();
        for (day, amount) in [(3, 100), (17, -40)] {
            repo.upsert_transaction(&Transaction::new(
                Uuid::new_v4(),
                client.id,
                account.id,
                Decimal::new(amount, 0),
                NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
                TransactionType::Ach,
            ))
            .unwrap();
        }

        let status = StatusService::new(repo).get_status().unwrap();
        assert_eq!(status.total_clients, 1);
        assert_eq!(status.total_accounts, 1);
        assert_eq!(status.total_transactions, 2);
        assert_eq!(status.clients[0].industry.as_deref(), Some("retail"));
        assert_eq!(status.date_range.earliest.as_deref(), Some("2025-02-03"));
        assert_eq!(status.date_range.latest.as_deref(), Some("2025-02-17"));
    }

    #[test]
    fn test_empty_store() {
        let repo = repository();
        let status = StatusService::new(repo).get_status().unwrap();
        assert_eq!(status.total_transactions, 0);
        assert!(status.date_range.earliest.is_none());
    }
}
