//! Refresh Token Entity
//!
//! A ledger record. Unlike access tokens, a refresh token is valid only as
//! long as this record says so.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::domain::value_object::UserId;

#[derive(Clone)]
pub struct RefreshToken {
    /// Opaque random token (hex, 64 chars)
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    /// Set once on revocation, never cleared
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(token: String, user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            token,
            user_id,
            expires_at: now + ttl,
            revoked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("revoked_at", &self.revoked_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_live() {
        let token = RefreshToken::new("abc".into(), UserId::new(), Duration::days(60));
        assert!(!token.is_revoked());
        assert!(!token.is_expired_at(Utc::now()));
        assert!(token.is_expired_at(Utc::now() + Duration::days(61)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = RefreshToken::new("super-secret".into(), UserId::new(), Duration::days(1));
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
