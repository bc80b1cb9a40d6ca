//! Repository port - read access to clients and their transactions

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Client, ClientAccount, Transaction, TransactionQuery};

/// Data access abstraction consumed by the analytics services
///
/// The engine is a read-only consumer: it resolves clients and fetches
/// transactions matching a query, ordered by date. Implementations guarantee
/// read consistency; callers do not lock.
#[async_trait]
pub trait Repository: Send + Sync {
    // === Clients ===

    /// Get all clients, ordered by name
    async fn get_clients(&self) -> Result<Vec<Client>>;

    /// Get client by ID
    async fn get_client(&self, id: Uuid) -> Result<Option<Client>>;

    /// Get the accounts held by a client
    async fn get_client_accounts(&self, client_id: Uuid) -> Result<Vec<ClientAccount>>;

    // === Transactions ===

    /// Fetch transactions for the query's client matching its filter,
    /// ordered by date in the query's direction and truncated to its limit
    async fn get_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;
}
