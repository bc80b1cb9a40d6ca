//! DuckDB repository implementation

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use duckdb::types::Type;
use duckdb::{params, Connection, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Client, ClientAccount, SortOrder, Transaction, TransactionQuery, TransactionType,
};
use crate::ports::Repository;
use crate::services::{DateRange, MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const TRANSACTION_COLUMNS: &str = "transaction_id, client_id, account_id,
    CAST(transaction_date AS VARCHAR), CAST(amount AS VARCHAR), transaction_type,
    category, counterparty, description, CAST(balance_after AS VARCHAR),
    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB-backed store for clients, accounts and transactions
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the database file at `db_path`
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            delay_ms = delay.as_millis() as u64,
                            attempt = attempt + 1,
                            max = MAX_RETRIES,
                            error = %err_msg,
                            "database busy, retrying"
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("Failed to open database after {} retries", MAX_RETRIES)
        }))
    }

    /// Throwaway in-memory database
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory_with_flags(config)?),
        })
    }

    fn try_open_connection(db_path: &Path) -> anyhow::Result<Connection> {
        // Autoloading would pull cached extensions from ~/.duckdb
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::database("database connection lock poisoned"))
    }

    /// Run pending migrations using the MigrationService
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.connection()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    // === Client operations ===

    pub fn upsert_client(&self, client: &Client) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO clients (client_id, name, industry, business_segment, relationship_manager,
                                  created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP))
             ON CONFLICT (client_id) DO UPDATE SET
                name = EXCLUDED.name,
                industry = EXCLUDED.industry,
                business_segment = EXCLUDED.business_segment,
                relationship_manager = EXCLUDED.relationship_manager,
                updated_at = EXCLUDED.updated_at",
            params![
                client.id.to_string(),
                client.name,
                client.industry,
                client.business_segment,
                client.relationship_manager,
                format_timestamp(&client.created_at),
                format_timestamp(&client.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn query_clients(&self) -> Result<Vec<Client>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT client_id, name, industry, business_segment, relationship_manager,
                    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)
             FROM clients
             ORDER BY name, client_id",
        )?;
        let clients = stmt
            .query_map([], row_to_client)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(clients)
    }

    pub fn query_client(&self, id: Uuid) -> Result<Option<Client>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT client_id, name, industry, business_segment, relationship_manager,
                    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)
             FROM clients
             WHERE client_id = ?",
        )?;
        let mut rows = stmt.query_map([id.to_string()], row_to_client)?;
        Ok(rows.next().transpose()?)
    }

    // === Account operations ===

    pub fn upsert_account(&self, account: &ClientAccount) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO client_accounts (account_id, client_id, name, account_type, bank_name,
                                          currency, created_at)
             VALUES (?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))
             ON CONFLICT (account_id) DO UPDATE SET
                client_id = EXCLUDED.client_id,
                name = EXCLUDED.name,
                account_type = EXCLUDED.account_type,
                bank_name = EXCLUDED.bank_name,
                currency = EXCLUDED.currency",
            params![
                account.id.to_string(),
                account.client_id.to_string(),
                account.name,
                account.account_type,
                account.bank_name,
                account.currency,
                format_timestamp(&account.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn query_accounts(&self, client_id: Uuid) -> Result<Vec<ClientAccount>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT account_id, client_id, name, account_type, bank_name, currency,
                    CAST(created_at AS VARCHAR)
             FROM client_accounts
             WHERE client_id = ?
             ORDER BY name, account_id",
        )?;
        let accounts = stmt
            .query_map([client_id.to_string()], |row| {
                Ok(ClientAccount {
                    id: parse_column(row, 0)?,
                    client_id: parse_column(row, 1)?,
                    name: row.get(2)?,
                    account_type: row.get(3)?,
                    bank_name: row.get(4)?,
                    currency: row.get(5)?,
                    created_at: timestamp_column(row, 6)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(accounts)
    }

    // === Transaction operations ===

    pub fn upsert_transaction(&self, tx: &Transaction) -> Result<()> {
        let conn = self.connection()?;
        insert_transaction(&conn, tx)?;
        Ok(())
    }

    /// Upsert many transactions in one database transaction
    pub fn upsert_transactions(&self, transactions: &[Transaction]) -> Result<usize> {
        let mut conn = self.connection()?;
        let db_tx = conn.transaction()?;
        for tx in transactions {
            insert_transaction(&db_tx, tx)?;
        }
        db_tx.commit()?;
        Ok(transactions.len())
    }

    /// Execute a transaction query, pushing the whole filter down to SQL
    pub fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let (sql, params) = build_transaction_query(query);
        tracing::debug!(client_id = %query.client_id, params = params.len(), "querying transactions");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|b| b.as_ref()).collect();
        let transactions = stmt
            .query_map(param_refs.as_slice(), row_to_transaction)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(transactions)
    }

    pub fn get_client_count(&self) -> Result<i64> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_account_count(&self) -> Result<i64> {
        let conn = self.connection()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM client_accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_transaction_count(&self) -> Result<i64> {
        let conn = self.connection()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_transaction_date_range(&self) -> Result<DateRange> {
        let conn = self.connection()?;
        let (earliest, latest): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(transaction_date)::VARCHAR, MAX(transaction_date)::VARCHAR
             FROM transactions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(DateRange { earliest, latest })
    }
}

#[async_trait]
impl Repository for DuckDbRepository {
    async fn get_clients(&self) -> Result<Vec<Client>> {
        self.query_clients()
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
        self.query_client(id)
    }

    async fn get_client_accounts(&self, client_id: Uuid) -> Result<Vec<ClientAccount>> {
        self.query_accounts(client_id)
    }

    async fn get_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.query_transactions(query)
    }
}

fn insert_transaction(conn: &Connection, tx: &Transaction) -> duckdb::Result<usize> {
    conn.execute(
        "INSERT INTO transactions (transaction_id, client_id, account_id, transaction_date, amount,
                                   transaction_type, category, counterparty, description,
                                   balance_after, created_at, updated_at)
         VALUES (?, ?, ?, CAST(? AS DATE), CAST(? AS DECIMAL(18,2)), ?, ?, ?, ?,
                 CAST(? AS DECIMAL(18,2)), CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP))
         ON CONFLICT (transaction_id) DO UPDATE SET
            client_id = EXCLUDED.client_id,
            account_id = EXCLUDED.account_id,
            transaction_date = EXCLUDED.transaction_date,
            amount = EXCLUDED.amount,
            transaction_type = EXCLUDED.transaction_type,
            category = EXCLUDED.category,
            counterparty = EXCLUDED.counterparty,
            description = EXCLUDED.description,
            balance_after = EXCLUDED.balance_after,
            updated_at = EXCLUDED.updated_at",
        params![
            tx.id.to_string(),
            tx.client_id.to_string(),
            tx.account_id.to_string(),
            tx.date.to_string(),
            tx.amount.to_string(),
            tx.transaction_type.as_str(),
            tx.category,
            tx.counterparty,
            tx.description,
            tx.balance_after.map(|b| b.to_string()),
            format_timestamp(&tx.created_at),
            format_timestamp(&tx.updated_at),
        ],
    )
}

/// Build the SELECT and its positional parameters for a query
fn build_transaction_query(query: &TransactionQuery) -> (String, Vec<Box<dyn ToSql>>) {
    let filter = &query.filter;
    let mut sql = format!("SELECT {} FROM transactions WHERE client_id = ?", TRANSACTION_COLUMNS);
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(query.client_id.to_string())];

    if let Some(start) = filter.start_date {
        sql.push_str(" AND transaction_date >= CAST(? AS DATE)");
        params.push(Box::new(start.to_string()));
    }
    if let Some(end) = filter.end_date {
        sql.push_str(" AND transaction_date <= CAST(? AS DATE)");
        params.push(Box::new(end.to_string()));
    }
    if let Some(account_id) = filter.account_id {
        sql.push_str(" AND account_id = ?");
        params.push(Box::new(account_id.to_string()));
    }
    if !filter.categories.is_empty() {
        sql.push_str(&format!(
            " AND COALESCE(NULLIF(TRIM(category), ''), '{}') IN ({})",
            crate::domain::UNCATEGORIZED,
            placeholders(filter.categories.len())
        ));
        for category in &filter.categories {
            params.push(Box::new(category.clone()));
        }
    }
    if !filter.types.is_empty() {
        sql.push_str(&format!(" AND transaction_type IN ({})", placeholders(filter.types.len())));
        for t in &filter.types {
            params.push(Box::new(t.as_str().to_string()));
        }
    }
    if let Some(min) = filter.min_amount {
        sql.push_str(" AND amount >= CAST(? AS DECIMAL(18,2))");
        params.push(Box::new(min.to_string()));
    }
    if let Some(max) = filter.max_amount {
        sql.push_str(" AND amount <= CAST(? AS DECIMAL(18,2))");
        params.push(Box::new(max.to_string()));
    }

    match query.order {
        SortOrder::Ascending => sql.push_str(" ORDER BY transaction_date ASC, created_at ASC, transaction_id"),
        SortOrder::Descending => sql.push_str(" ORDER BY transaction_date DESC, created_at DESC, transaction_id"),
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    (sql, params)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn row_to_client(row: &duckdb::Row) -> duckdb::Result<Client> {
    Ok(Client {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
        industry: row.get(2)?,
        business_segment: row.get(3)?,
        relationship_manager: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
        updated_at: timestamp_column(row, 6)?,
    })
}

fn row_to_transaction(row: &duckdb::Row) -> duckdb::Result<Transaction> {
    let balance_after: Option<String> = row.get(9)?;
    Ok(Transaction {
        id: parse_column(row, 0)?,
        client_id: parse_column(row, 1)?,
        account_id: parse_column(row, 2)?,
        date: parse_column::<NaiveDate>(row, 3)?,
        amount: parse_column::<Decimal>(row, 4)?,
        transaction_type: parse_column::<TransactionType>(row, 5)?,
        category: row.get(6)?,
        counterparty: row.get(7)?,
        description: row.get(8)?,
        balance_after: balance_after
            .map(|s| parse_text::<Decimal>(9, &s))
            .transpose()?,
        created_at: timestamp_column(row, 10)?,
        updated_at: timestamp_column(row, 11)?,
    })
}

/// Read a text column and parse it, reporting failures as conversion errors
fn parse_column<T>(row: &duckdb::Row, idx: usize) -> duckdb::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    parse_text(idx, &text)
}

fn parse_text<T>(idx: usize, text: &str) -> duckdb::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &duckdb::Row, idx: usize) -> duckdb::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionFilter;

    fn repo() -> DuckDbRepository {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        repo
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn seed(repo: &DuckDbRepository) -> (Client, ClientAccount) {
        let client = Client::new(Uuid::new_v4(), "Acme Corp").with_profile("technology", "enterprise");
        repo.upsert_client(&client).unwrap();
        let account = ClientAccount::new(Uuid::new_v4(), client.id, "Operating");
        repo.upsert_account(&account).unwrap();
        (client, account)
    }

    fn tx(client: &Client, account: &ClientAccount, amount: &str, day: u32) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            client.id,
            account.id,
            Decimal::from_str(amount).unwrap(),
            date(day),
            TransactionType::Ach,
        )
    }

    #[test]
    fn test_client_round_trip() {
        let repo = repo();
        let (client, account) = seed(&repo);

        let loaded = repo.query_client(client.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Acme Corp");
        assert_eq!(loaded.industry.as_deref(), Some("technology"));
        assert!(repo.query_client(Uuid::new_v4()).unwrap().is_none());

        let accounts = repo.query_accounts(client.id).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, account.id);
    }

    #[test]
    fn test_amounts_are_exact() {
        let repo = repo();
        let (client, account) = seed(&repo);
        let mut t = tx(&client, &account, "-1234.56", 1);
        t.balance_after = Some(Decimal::from_str("98765.43").unwrap());
        t.category = Some("Payroll".to_string());
        repo.upsert_transaction(&t).unwrap();

        let loaded = repo.query_transactions(&TransactionQuery::all(client.id)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].amount, Decimal::from_str("-1234.56").unwrap());
        assert_eq!(loaded[0].balance_after, Some(Decimal::from_str("98765.43").unwrap()));
        assert_eq!(loaded[0].date, date(1));
        assert_eq!(loaded[0].category.as_deref(), Some("Payroll"));
    }

    #[test]
    fn test_filter_pushdown() {
        let repo = repo();
        let (client, account) = seed(&repo);
        let mut wire = tx(&client, &account, "500", 2);
        wire.transaction_type = TransactionType::Wire;
        let mut travel = tx(&client, &account, "-40", 3);
        travel.category = Some("Travel".to_string());
        let batch = vec![
            tx(&client, &account, "100", 1),
            wire,
            travel,
            tx(&client, &account, "-10", 10),
        ];
        assert_eq!(repo.upsert_transactions(&batch).unwrap(), 4);

        let window = TransactionQuery::new(client.id, TransactionFilter::between(date(2), date(3)));
        assert_eq!(repo.query_transactions(&window).unwrap().len(), 2);

        let uncategorized = TransactionQuery::new(
            client.id,
            TransactionFilter {
                categories: vec!["Uncategorized".to_string()],
                ..TransactionFilter::default()
            },
        );
        assert_eq!(repo.query_transactions(&uncategorized).unwrap().len(), 3);

        let wires = TransactionQuery::new(
            client.id,
            TransactionFilter {
                types: vec![TransactionType::Wire],
                ..TransactionFilter::default()
            },
        );
        assert_eq!(repo.query_transactions(&wires).unwrap()[0].amount, Decimal::new(500, 0));

        let outflows = TransactionQuery::new(
            client.id,
            TransactionFilter {
                max_amount: Some(Decimal::ZERO),
                ..TransactionFilter::default()
            },
        );
        assert_eq!(repo.query_transactions(&outflows).unwrap().len(), 2);

        let recent = repo
            .query_transactions(&TransactionQuery::most_recent(client.id, 2))
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date(10));
        assert_eq!(recent[1].date, date(3));
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let repo = repo();
        let (client, account) = seed(&repo);
        let mut t = tx(&client, &account, "10", 1);
        repo.upsert_transaction(&t).unwrap();
        t.amount = Decimal::new(25, 0);
        repo.upsert_transaction(&t).unwrap();

        assert_eq!(repo.get_transaction_count().unwrap(), 1);
        let range = repo.get_transaction_date_range().unwrap();
        assert_eq!(range.earliest.as_deref(), Some("2025-03-01"));
    }

    #[tokio::test]
    async fn test_repository_port() {
        let repo = repo();
        let (client, _) = seed(&repo);
        let port: &dyn Repository = &repo;
        assert_eq!(port.get_clients().await.unwrap().len(), 1);
        assert!(port.get_client(client.id).await.unwrap().is_some());
    }
}
