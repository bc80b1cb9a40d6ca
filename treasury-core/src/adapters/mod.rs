//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the Repository port
//! - An in-memory Repository for tests and embedding
//! - Demo data generation

pub mod demo;
pub mod duckdb;
pub mod memory;
