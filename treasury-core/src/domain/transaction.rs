//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::Error;

/// Label used for transactions that carry no category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How money moved for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Debit,
    Credit,
    Ach,
    Wire,
    Check,
    Transfer,
    Fee,
    Interest,
    Other,
}

impl TransactionType {
    pub const ALL: [TransactionType; 9] = [
        TransactionType::Debit,
        TransactionType::Credit,
        TransactionType::Ach,
        TransactionType::Wire,
        TransactionType::Check,
        TransactionType::Transfer,
        TransactionType::Fee,
        TransactionType::Interest,
        TransactionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
            TransactionType::Ach => "ACH",
            TransactionType::Wire => "WIRE",
            TransactionType::Check => "CHECK",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Fee => "FEE",
            TransactionType::Interest => "INTEREST",
            TransactionType::Other => "OTHER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| Error::bad_request(format!("Invalid transaction type: {}", s)))
    }
}

/// A single posted transaction on a client account
///
/// Amounts are signed: positive is an inflow, negative an outflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub client_id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Option<String>,
    pub counterparty: Option<String>,
    pub description: Option<String>,
    /// Running account balance after this transaction posted, when the statement provides it
    pub balance_after: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with required fields
    pub fn new(
        id: Uuid,
        client_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        transaction_type: TransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            client_id,
            account_id,
            date,
            amount,
            transaction_type,
            category: None,
            counterparty: None,
            description: None,
            balance_after: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Category name, falling back to "Uncategorized"
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Balance after posting, with missing values counted as zero
    pub fn balance_or_zero(&self) -> Decimal {
        self.balance_after.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(amount: i64) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Decimal::new(amount, 2),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            TransactionType::Ach,
        )
    }

    #[test]
    fn test_direction() {
        assert!(sample(1000).is_inflow());
        assert!(sample(-1000).is_outflow());
        let zero = sample(0);
        assert!(!zero.is_inflow() && !zero.is_outflow());
    }

    #[test]
    fn test_category_label() {
        let mut tx = sample(-500);
        assert_eq!(tx.category_label(), UNCATEGORIZED);
        tx.category = Some("Payroll".to_string());
        assert_eq!(tx.category_label(), "Payroll");
        tx.category = Some("  ".to_string());
        assert_eq!(tx.category_label(), UNCATEGORIZED);
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("ach".parse::<TransactionType>().unwrap(), TransactionType::Ach);
        assert_eq!(" Wire ".parse::<TransactionType>().unwrap(), TransactionType::Wire);
        assert!(matches!(
            "BITCOIN".parse::<TransactionType>(),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn test_transaction_type_serializes_uppercase() {
        let json = serde_json::to_string(&TransactionType::Interest).unwrap();
        assert_eq!(json, "\"INTEREST\"");
        let tx = sample(100);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "ACH");
        assert!(value.get("balanceAfter").is_some());
    }
}
