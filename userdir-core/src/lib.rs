//! userdir core - a user directory with friend enrichment
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, EnrichedUser, Selection, SessionToken)
//! - **ports**: Trait definitions for external dependencies (DirectoryStore, SessionStore, Navigator)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, HTTP, session file)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbDirectoryStore;
use adapters::http::HttpDirectoryStore;
use adapters::session_file::FileSessionStore;
use config::{Config, DataSource};
use ports::DirectoryStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{EnrichedUser, Selection, SessionToken, User};
pub use domain::result::Error;

/// Main context for directory operations
///
/// Holds the configuration, the local store and every service wired to
/// the store picked by the configuration.
pub struct DirectoryContext {
    pub config: Config,
    pub store: Arc<DuckDbDirectoryStore>,
    pub directory_service: DirectoryService,
    pub session_service: Arc<SessionService>,
    pub import_service: ImportService,
    pub status_service: StatusService,
}

impl DirectoryContext {
    /// Create a new context rooted at the data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(config.db_filename());
        let store = Arc::new(DuckDbDirectoryStore::new(&db_path)?);

        // Initialize schema
        store.ensure_schema()?;

        let source: Arc<dyn DirectoryStore> = match config.data_source() {
            DataSource::Local => Arc::clone(&store) as Arc<dyn DirectoryStore>,
            DataSource::Remote(url) => Arc::new(HttpDirectoryStore::new(&url)?),
        };

        let directory_service = DirectoryService::new(source);
        let session_service =
            Arc::new(SessionService::new(Arc::new(FileSessionStore::new(data_dir))));
        let import_service = ImportService::new(Arc::clone(&store));
        let status_service = StatusService::new(Arc::clone(&store), Arc::clone(&session_service));

        Ok(Self {
            config,
            store,
            directory_service,
            session_service,
            import_service,
            status_service,
        })
    }
}
