//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod client;
pub mod filter;
pub mod result;
mod transaction;

pub use client::{Client, ClientAccount};
pub use filter::{SortOrder, TransactionFilter, TransactionQuery};
pub use transaction::{Transaction, TransactionType, UNCATEGORIZED};
