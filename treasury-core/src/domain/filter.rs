//! Transaction selection criteria
//!
//! A `TransactionFilter` is the request-level predicate (date range, account,
//! categories, types, amount bounds). A `TransactionQuery` binds it to a client
//! together with ordering and an optional row limit, and is what repositories
//! execute.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::{Transaction, TransactionType};

/// Optional predicate over a client's transactions
///
/// Date bounds are inclusive. Amount bounds apply to the signed amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub types: Vec<TransactionType>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl TransactionFilter {
    /// Filter restricted to an inclusive date window
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    /// Same filter with its date bounds replaced
    pub fn with_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start,
            end_date: end,
            ..self.clone()
        }
    }

    /// Evaluate the predicate against a single transaction
    ///
    /// Repositories that cannot push the predicate down to storage use this.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.start_date.is_some_and(|start| tx.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| tx.date > end) {
            return false;
        }
        if self.account_id.is_some_and(|id| tx.account_id != id) {
            return false;
        }
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| c == tx.category_label())
        {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&tx.transaction_type) {
            return false;
        }
        if self.min_amount.is_some_and(|min| tx.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| tx.amount > max) {
            return false;
        }
        true
    }
}

/// Row ordering by transaction date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A filter bound to a client, with ordering and an optional limit
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub client_id: Uuid,
    pub filter: TransactionFilter,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    /// All transactions for a client matching `filter`, oldest first
    pub fn new(client_id: Uuid, filter: TransactionFilter) -> Self {
        Self {
            client_id,
            filter,
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    /// Every transaction for a client, oldest first
    pub fn all(client_id: Uuid) -> Self {
        Self::new(client_id, TransactionFilter::default())
    }

    /// The `limit` most recent transactions for a client, newest first
    pub fn most_recent(client_id: Uuid, limit: usize) -> Self {
        Self {
            client_id,
            filter: TransactionFilter::default(),
            order: SortOrder::Descending,
            limit: Some(limit),
        }
    }
}
