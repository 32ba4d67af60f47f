//! Demo service - manage demo mode
//!
//! Demo mode swaps the directory database for demo.duckdb, filled with the
//! sample users, so the directory can be explored without importing data.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::adapters::demo::generate_demo_users;
use crate::adapters::duckdb::DuckDbDirectoryStore;
use crate::config::Config;

const DEMO_DB: &str = "demo.duckdb";
const DEMO_WAL: &str = "demo.duckdb.wal";

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

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(Config::load(&self.data_dir)?.is_demo_mode())
    }

    /// Recreate the demo database and switch demo mode on
    pub fn enable(&self) -> Result<usize> {
        self.remove_demo_files()?;

        let mut config = Config::load(&self.data_dir)?;
        config.enable_demo_mode();
        config.save(&self.data_dir)?;

        let store = DuckDbDirectoryStore::new(&self.data_dir.join(DEMO_DB))?;
        store.ensure_schema()?;

        let users = generate_demo_users();
        for user in &users {
            store.upsert_user(user)?;
        }

        Ok(users.len())
    }

    /// Switch demo mode off, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir)?;
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
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}
