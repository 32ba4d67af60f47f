//! DuckDB directory store

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result as DomainResult};
use crate::domain::User;
use crate::migrations::MIGRATIONS;
use crate::ports::DirectoryStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Call `open` until it succeeds, backing off while the error is a lock conflict
fn open_with_retry<T>(mut open: impl FnMut() -> Result<T>) -> Result<T> {
    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        match open() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err_msg = e.to_string();
                if !is_retryable_error(&err_msg) || attempt == MAX_RETRIES - 1 {
                    return Err(e);
                }
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                eprintln!(
                    "[userdir] Database busy, retrying in {}ms (attempt {}/{}): {}",
                    delay.as_millis(),
                    attempt + 1,
                    MAX_RETRIES,
                    err_msg
                );
                thread::sleep(delay);
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
}

/// DuckDB-backed directory store
pub struct DuckDbDirectoryStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbDirectoryStore {
    /// Open (or create) the directory database
    ///
    /// Retries with exponential backoff when another process holds the file
    /// lock, e.g. an import running while the directory is browsed.
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = open_with_retry(|| Self::try_open_connection(db_path))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Open an in-memory store (tests, throwaway sessions)
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs an extension
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Apply pending migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure the schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === User operations ===

    /// Insert or replace a user and its friend list
    ///
    /// An existing user keeps its arrival position.
    pub fn upsert_user(&self, user: &User) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        write_user(&tx, user)?;
        tx.commit()?;
        Ok(())
    }

    /// Write a batch of users in a single transaction
    ///
    /// With `replace`, stored users absent from the batch are removed. A batch
    /// that fails partway leaves the store as it was. Returns the number of
    /// users removed.
    pub fn write_users(&self, users: &[User], replace: bool) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut removed = 0;
        if replace {
            let incoming: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
            let stale: Vec<String> = {
                let mut stmt = tx.prepare("SELECT user_id FROM sys_users")?;
                let ids = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<duckdb::Result<Vec<_>>>()?;
                ids.into_iter()
                    .filter(|id| !incoming.contains(id.as_str()))
                    .collect()
            };
            for id in &stale {
                tx.execute("DELETE FROM sys_user_friends WHERE user_id = ?", params![id])?;
                tx.execute("DELETE FROM sys_users WHERE user_id = ?", params![id])?;
            }
            removed = stale.len();
        }

        for user in users {
            write_user(&tx, user).with_context(|| format!("Failed to store user {}", user.id))?;
        }

        tx.commit()?;
        Ok(removed)
    }

    /// All users in arrival order, friends in stored order
    pub fn get_users(&self) -> Result<Vec<User>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, user_rank, name, email, image FROM sys_users ORDER BY arrival",
        )?;
        let mut users = stmt
            .query_map([], row_to_user)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, friend_id FROM sys_user_friends ORDER BY user_id, friend_position",
        )?;
        let mut friends: HashMap<String, Vec<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (user_id, friend_id) = row?;
            friends.entry(user_id).or_default().push(friend_id);
        }

        for user in &mut users {
            if let Some(list) = friends.remove(&user.id) {
                user.friends = list;
            }
        }

        Ok(users)
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.lock()?;

        let user = {
            let mut stmt = conn.prepare(
                "SELECT user_id, user_rank, name, email, image FROM sys_users WHERE user_id = ?",
            )?;
            let mut rows = stmt.query_map([id], row_to_user)?;
            rows.next().transpose()?
        };
        let Some(user) = user else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT friend_id FROM sys_user_friends WHERE user_id = ? ORDER BY friend_position",
        )?;
        let friends = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;

        Ok(Some(User { friends, ..user }))
    }

    /// Delete a user and its own friend list
    ///
    /// Other users' references to it are left in place and become dangling.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_user_friends WHERE user_id = ?", [id])?;
        let deleted = conn.execute("DELETE FROM sys_users WHERE user_id = ?", [id])?;
        Ok(deleted > 0)
    }

    /// Remove every user. Returns how many were removed.
    pub fn clear_users(&self) -> Result<usize> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_user_friends", [])?;
        let deleted = conn.execute("DELETE FROM sys_users", [])?;
        Ok(deleted)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_users", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_friend_links(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_user_friends", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct friend ids that match no stored user, sorted
    pub fn find_dangling_friend_ids(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT f.friend_id FROM sys_user_friends f
             LEFT JOIN sys_users u ON f.friend_id = u.user_id
             WHERE u.user_id IS NULL
             ORDER BY f.friend_id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(ids)
    }
}

/// Upsert one user row and rewrite its friend rows
fn write_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO sys_users (user_id, user_rank, name, email, image)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id) DO UPDATE SET
            user_rank = EXCLUDED.user_rank,
            name = EXCLUDED.name,
            email = EXCLUDED.email,
            image = EXCLUDED.image,
            updated_at = now()",
        params![user.id, user.rank, user.name, user.email, user.image],
    )?;

    conn.execute("DELETE FROM sys_user_friends WHERE user_id = ?", params![user.id])?;
    for (position, friend_id) in user.friends.iter().enumerate() {
        conn.execute(
            "INSERT INTO sys_user_friends (user_id, friend_position, friend_id) VALUES (?, ?, ?)",
            params![user.id, position as i64, friend_id],
        )?;
    }
    Ok(())
}

fn row_to_user(row: &duckdb::Row) -> duckdb::Result<User> {
    Ok(User {
        id: row.get(0)?,
        rank: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        image: row.get(4)?,
        friends: Vec::new(),
    })
}

#[async_trait]
impl DirectoryStore for DuckDbDirectoryStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.get_users().map_err(|e| Error::database(e.to_string()))
    }
}
