//! Session token model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque credential whose presence grants access to the directory
///
/// The contents are never interpreted. Only the fingerprint is safe to
/// print or log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            created_at: Utc::now(),
        }
    }

    /// Issue a fresh random token
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// First 12 hex characters of the token's SHA-256 digest
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.token.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(12);
        encoded
    }

    /// A blank token counts as no token at all
    pub fn is_present(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a.token, b.token);
        assert!(a.is_present());
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let token = SessionToken::new("abc");
        assert_eq!(token.fingerprint(), token.fingerprint());
        assert_eq!(token.fingerprint().len(), 12);
        // sha256("abc")
        assert_eq!(token.fingerprint(), "ba7816bf8f01");
    }

    #[test]
    fn test_blank_token_is_not_present() {
        assert!(!SessionToken::new("   ").is_present());
    }
}
