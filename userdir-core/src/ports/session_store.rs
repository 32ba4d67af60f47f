//! Session store port - where the current session token lives

use crate::domain::result::Result;
use crate::domain::SessionToken;

/// Storage for the caller's session token
///
/// Implementations are handed to the session gate explicitly; nothing in
/// the core reads a token from ambient process state.
pub trait SessionStore: Send + Sync {
    /// Current token, if any
    fn load(&self) -> Result<Option<SessionToken>>;

    /// Store a token, replacing any previous one
    fn save(&self, token: &SessionToken) -> Result<()>;

    /// Forget the current token. Returns whether one existed.
    fn clear(&self) -> Result<bool>;
}
