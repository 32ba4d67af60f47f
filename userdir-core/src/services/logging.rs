//! Logging service - directory event log in DuckDB
//!
//! Events are stored in logs.duckdb in the data directory. Directory
//! contents (names, emails, friend lists) and raw session tokens are never
//! logged. An event carries its name, the CLI command, the directory source
//! it concerned and an optional error message.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::{params, Connection};
use serde::Serialize;

use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::MigrationService;

/// Event names recorded by the front-ends
pub mod events {
    pub const COMMAND_EXECUTED: &str = "command_executed";
    pub const DIRECTORY_LOADED: &str = "directory_loaded";
    pub const DIRECTORY_LOAD_FAILED: &str = "directory_load_failed";
    pub const SIGNUP_REDIRECT: &str = "signup_redirect";
    pub const SIGNUP_COMPLETED: &str = "signup_completed";
    pub const SIGNOUT_COMPLETED: &str = "signout_completed";
    pub const IMPORT_STARTED: &str = "import_started";
    pub const IMPORT_COMPLETED: &str = "import_completed";
    pub const IMPORT_FAILED: &str = "import_failed";
    pub const DEMO_ENABLED: &str = "demo_enabled";
    pub const DEMO_DISABLED: &str = "demo_disabled";
}

/// Counter for unique ids within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Timestamp in the upper 48 bits, counter in the lower 16
fn generate_id() -> u64 {
    let timestamp = now_ms() as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Current unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// An event to record
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub event: String,
    pub command: Option<String>,
    pub source: Option<String>,
    pub error_message: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            source: None,
            error_message: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Directory source the event concerns (duckdb, http, static)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A stored event
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub app_version: String,
    pub event: String,
    pub command: Option<String>,
    pub source: Option<String>,
    pub error_message: Option<String>,
}

/// Which entries [`LoggingService::recent`] returns
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub limit: usize,
    pub errors_only: bool,
    /// Exact event name
    pub event: Option<String>,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            errors_only: false,
            event: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventCount {
    pub event: String,
    pub count: i64,
}

/// Failed directory loads for one source
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailures {
    pub source: String,
    pub count: i64,
    pub last_timestamp: i64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogStats {
    pub total: i64,
    pub errors: i64,
    /// Times a gated view sent the user to sign-up
    pub signup_redirects: i64,
    pub by_event: Vec<EventCount>,
    pub load_failures: Vec<SourceFailures>,
    pub db_path: PathBuf,
}

fn row_to_entry(row: &duckdb::Row) -> duckdb::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        app_version: row.get(2)?,
        event: row.get(3)?,
        command: row.get(4)?,
        source: row.get(5)?,
        error_message: row.get(6)?,
    })
}

/// Service for the directory event log
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
}

impl LoggingService {
    /// Open or create logs.duckdb in the data directory and migrate it
    pub fn new(data_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = data_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_logs (
                id, timestamp, app_version, event, command, source, error_message
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                generate_id(),
                now_ms(),
                &self.app_version,
                &event.event,
                &event.command,
                &event.source,
                &event.error_message,
            ],
        )?;
        Ok(())
    }

    /// Newest entries first
    pub fn recent(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, app_version, event, command, source, error_message
             FROM sys_logs
             WHERE (NOT CAST(? AS BOOLEAN) OR error_message IS NOT NULL)
               AND (CAST(? AS VARCHAR) IS NULL OR event = CAST(? AS VARCHAR))
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )?;
        let entries = stmt
            .query_map(
                params![query.errors_only, &query.event, &query.event, query.limit as i64],
                row_to_entry,
            )?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Totals, per-event counts and failed loads per directory source
    pub fn stats(&self) -> Result<LogStats> {
        let conn = self.lock()?;

        let (total, errors): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COUNT(error_message) FROM sys_logs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT event, COUNT(*) AS n FROM sys_logs
             GROUP BY event ORDER BY n DESC, event",
        )?;
        let by_event = stmt
            .query_map([], |row| {
                Ok(EventCount {
                    event: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT COALESCE(source, 'unknown') AS src, COUNT(*), MAX(timestamp),
                    arg_max(error_message, timestamp)
             FROM sys_logs
             WHERE event = ?
             GROUP BY src ORDER BY src",
        )?;
        let load_failures = stmt
            .query_map([events::DIRECTORY_LOAD_FAILED], |row| {
                Ok(SourceFailures {
                    source: row.get(0)?,
                    count: row.get(1)?,
                    last_timestamp: row.get(2)?,
                    last_error: row.get(3)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;

        let signup_redirects = by_event
            .iter()
            .find(|c| c.event == events::SIGNUP_REDIRECT)
            .map_or(0, |c| c.count);

        Ok(LogStats {
            total,
            errors,
            signup_redirects,
            by_event,
            load_failures,
            db_path: self.db_path.clone(),
        })
    }

    /// Delete entries older than the given unix ms timestamp
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
