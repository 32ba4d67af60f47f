//! Core domain entities
//!
//! All directory entities are defined here. These are pure data structures
//! with no I/O or external dependencies.

mod enriched;
mod selection;
mod session;
mod user;
pub mod result;

pub use enriched::{EnrichedUser, UNKNOWN_FRIEND};
pub use selection::Selection;
pub use session::SessionToken;
pub use user::User;
