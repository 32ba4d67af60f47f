//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the DirectoryStore port (local directory)
//! - HTTP client for the DirectoryStore port (remote directory service)
//! - JSON file for the SessionStore port
//! - Demo data for onboarding and tests

pub mod demo;
pub mod duckdb;
pub mod http;
pub mod session_file;
