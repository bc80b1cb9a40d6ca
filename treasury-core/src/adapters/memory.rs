//! In-memory repository
//!
//! Evaluates queries with `TransactionFilter::matches`, so it behaves like
//! the DuckDB adapter without touching disk. Used by tests and by callers
//! that already hold their rows in memory.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Client, ClientAccount, SortOrder, Transaction, TransactionQuery};
use crate::ports::Repository;

#[derive(Default)]
pub struct InMemoryRepository {
    clients: RwLock<Vec<Client>>,
    accounts: RwLock<Vec<ClientAccount>>,
    transactions: RwLock<Vec<Transaction>>,
}

fn poisoned() -> Error {
    Error::database("in-memory store lock poisoned")
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&self, client: Client) -> Result<()> {
        let mut clients = self.clients.write().map_err(|_| poisoned())?;
        clients.retain(|c| c.id != client.id);
        clients.push(client);
        Ok(())
    }

    pub fn add_account(&self, account: ClientAccount) -> Result<()> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        accounts.retain(|a| a.id != account.id);
        accounts.push(account);
        Ok(())
    }

    pub fn add_transactions(&self, transactions: impl IntoIterator<Item = Transaction>) -> Result<()> {
        let mut stored = self.transactions.write().map_err(|_| poisoned())?;
        for tx in transactions {
            stored.retain(|t| t.id != tx.id);
            stored.push(tx);
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_clients(&self) -> Result<Vec<Client>> {
        let mut clients = self.clients.read().map_err(|_| poisoned())?.clone();
        clients.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(clients)
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
        let clients = self.clients.read().map_err(|_| poisoned())?;
        Ok(clients.iter().find(|c| c.id == id).cloned())
    }

    async fn get_client_accounts(&self, client_id: Uuid) -> Result<Vec<ClientAccount>> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn get_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let stored = self.transactions.read().map_err(|_| poisoned())?;
        let mut matched: Vec<Transaction> = stored
            .iter()
            .filter(|tx| tx.client_id == query.client_id && query.filter.matches(tx))
            .cloned()
            .collect();

        match query.order {
            SortOrder::Ascending => matched.sort_by_key(|tx| tx.date),
            // insertion order stands in for posting order within a day
            SortOrder::Descending => {
                matched.sort_by_key(|tx| tx.date);
                matched.reverse();
            }
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
