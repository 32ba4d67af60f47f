//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod directory_store;
mod navigator;
mod session_store;

pub use directory_store::{DirectoryStore, StaticDirectory};
pub use navigator::Navigator;
pub use session_store::SessionStore;
