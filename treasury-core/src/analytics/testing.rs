//! Transaction builders for engine unit tests

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionType};

pub fn client_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000c1e7").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Day `d` of January 2025
pub fn day(d: u32) -> NaiveDate {
    date(2025, 1, d)
}

/// `n` days after 2025-01-01
pub fn offset(n: i64) -> NaiveDate {
    day(1) + Duration::days(n)
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Whole-unit ACH transaction without a running balance
pub fn tx(amount: i64, date: NaiveDate) -> Transaction {
    Transaction::new(
        Uuid::new_v4(),
        client_id(),
        Uuid::nil(),
        Decimal::new(amount, 0),
        date,
        TransactionType::Ach,
    )
}

pub fn tx_with_balance(date: NaiveDate, amount: &str, balance: &str) -> Transaction {
    let mut t = tx(0, date);
    t.amount = dec(amount);
    t.balance_after = Some(dec(balance));
    t
}

pub fn categorized(amount: i64, date: NaiveDate, category: &str) -> Transaction {
    let mut t = tx(amount, date);
    t.category = Some(category.to_string());
    t
}

pub fn vendor_payment(
    amount: i64,
    date: NaiveDate,
    counterparty: &str,
    transaction_type: TransactionType,
) -> Transaction {
    let mut t = tx(amount, date);
    t.counterparty = Some(counterparty.to_string());
    t.transaction_type = transaction_type;
    t
}
