//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod demo;
pub mod directory;
pub mod enrichment;
pub mod filter;
pub mod import;
pub mod logging;
pub mod migration;
pub mod session;
mod status;

pub use demo::DemoService;
pub use directory::{Directory, DirectoryService, DirectoryView, ViewEntry};
pub use enrichment::{enrich, enrich_all};
pub use filter::filter;
pub use import::{ImportFormat, ImportOptions, ImportResult, ImportService};
pub use logging::{
    events, EventCount, LogEntry, LogEvent, LogQuery, LogStats, LoggingService, SourceFailures,
};
pub use migration::{MigrationResult, MigrationService};
pub use session::{GateOutcome, RecheckPolicy, SessionGate, SessionService};
pub use status::{SourceSummary, StatusService, StatusSummary};
