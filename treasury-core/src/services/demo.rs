//! Demo service - manage demo mode
//!
//! Demo mode points the workspace at a separate `demo.duckdb` seeded with
//! generated clients, so analytics can be explored without real data.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::adapters::demo::generate_demo_data;
use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;
use crate::domain::Client;

const DEMO_DB: &str = "demo.duckdb";
const DEMO_WAL: &str = "demo.duckdb.wal";

/// What `DemoService::enable` wrote
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub clients: Vec<Client>,
    pub accounts: usize,
    pub transactions: usize,
    /// Last date covered by the generated activity
    pub through: NaiveDate,
}

/// Demo service for managing demo mode
pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.data_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// Recreates the demo database from scratch with data ending today,
    /// then flips the setting.
    pub fn enable(&self) -> Result<DemoSeed> {
        self.remove_demo_files()?;

        let demo_db = self.data_dir.join(DEMO_DB);
        let repository = DuckDbRepository::new(&demo_db)?;
        repository.ensure_schema()?;

        let through = Local::now().date_naive();
        let dataset = generate_demo_data(through);
        for client in &dataset.clients {
            repository.upsert_client(client)?;
        }
        for account in &dataset.accounts {
            repository.upsert_account(account)?;
        }
        let written = repository
            .upsert_transactions(&dataset.transactions)
            .context("Failed to write demo transactions")?;

        tracing::info!(
            clients = dataset.clients.len(),
            transactions = written,
            "demo database seeded"
        );

        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.data_dir)?;

        Ok(DemoSeed {
            clients: dataset.clients,
            accounts: dataset.accounts.len(),
            transactions: written,
            through,
        })
    }

    /// Disable demo mode, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if clean {
            self.remove_demo_files()?;
        }
        Ok(())
    }

    fn remove_demo_files(&self) -> Result<()> {
        for name in [DEMO_DB, DEMO_WAL] {
            let path = self.data_dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_enable_then_disable_clean() {
        let dir = TempDir::new().unwrap();
        let demo = DemoService::new(dir.path());

        let seed = demo.enable().unwrap();
        assert!(dir.path().join(DEMO_DB).exists());
        assert!(demo.is_enabled().unwrap());
        assert_eq!(seed.clients.len(), 3);
        assert_eq!(seed.accounts, 3);

        let repository = DuckDbRepository::new(&dir.path().join(DEMO_DB)).unwrap();
        assert_eq!(repository.get_client_count().unwrap(), 3);
        assert_eq!(repository.get_transaction_count().unwrap(), seed.transactions as i64);
        assert!(seed.transactions > 300);
        drop(repository);

        demo.disable(true).unwrap();
        assert!(!dir.path().join(DEMO_DB).exists());
    }
}
