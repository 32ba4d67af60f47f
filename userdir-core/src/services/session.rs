//! Session service - sign-up, sign-out and the directory gate
//!
//! The gate only checks that a token is present. It never validates or
//! interprets the token.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::SessionToken;
use crate::ports::{Navigator, SessionStore};

/// When the gate is consulted during an interactive session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecheckPolicy {
    /// Once, when the directory view opens
    #[default]
    Mount,
    /// Before every render
    Render,
}

impl std::str::FromStr for RecheckPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mount" => Ok(Self::Mount),
            "render" => Ok(Self::Render),
            other => Err(format!("unknown session recheck policy: {}", other)),
        }
    }
}

/// Result of consulting the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// A token is present; the directory may render
    Authenticated(SessionToken),
    /// No token; the navigator was sent to sign-up
    Redirected,
}

impl GateOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateOutcome::Authenticated(_))
    }
}

/// Decides whether the directory may render for the current caller
pub struct SessionGate<'a> {
    store: &'a dyn SessionStore,
    navigator: &'a dyn Navigator,
    policy: RecheckPolicy,
}

impl<'a> SessionGate<'a> {
    pub fn new(
        store: &'a dyn SessionStore,
        navigator: &'a dyn Navigator,
        policy: RecheckPolicy,
    ) -> Self {
        Self {
            store,
            navigator,
            policy,
        }
    }

    /// Consult the session store, redirecting when no token is present
    pub fn check(&self) -> Result<GateOutcome> {
        match self.store.load()? {
            Some(token) if token.is_present() => Ok(GateOutcome::Authenticated(token)),
            _ => {
                self.navigator.redirect_to_signup();
                Ok(GateOutcome::Redirected)
            }
        }
    }

    /// Gate check before a render after the first one
    ///
    /// Under [`RecheckPolicy::Mount`] the mount-time result stands and the
    /// store is not consulted again.
    pub fn recheck(&self, mounted: &GateOutcome) -> Result<GateOutcome> {
        match self.policy {
            RecheckPolicy::Mount => Ok(mounted.clone()),
            RecheckPolicy::Render => self.check(),
        }
    }

    pub fn policy(&self) -> RecheckPolicy {
        self.policy
    }
}

/// Session service for signing in and out
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Issue and store a fresh token
    pub fn sign_up(&self) -> Result<SessionToken> {
        let token = SessionToken::generate();
        self.store.save(&token)?;
        Ok(token)
    }

    /// Forget the current token. Returns whether one existed.
    pub fn sign_out(&self) -> Result<bool> {
        Ok(self.store.clear()?)
    }

    /// Current token, if any
    pub fn current(&self) -> Result<Option<SessionToken>> {
        Ok(self.store.load()?.filter(SessionToken::is_present))
    }

    /// Build a gate over this service's store
    pub fn gate<'a>(
        &'a self,
        navigator: &'a dyn Navigator,
        policy: RecheckPolicy,
    ) -> SessionGate<'a> {
        SessionGate::new(self.store.as_ref(), navigator, policy)
    }
}
