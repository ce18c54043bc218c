//! Refresh Token Ledger
//!
//! Issues, looks up, validates and revokes refresh tokens. The persisted
//! record is the only source of truth; nothing is cached in process.
//!
//! Tokens are not rotated: a refresh token stays usable until it expires
//! or is revoked.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenLedger<R>
where
    R: RefreshTokenRepository,
{
    repo: Arc<R>,
    ttl: Duration,
    store_timeout: StdDuration,
}

impl<R> RefreshTokenLedger<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repo: Arc<R>, ttl: Duration, store_timeout: StdDuration) -> Self {
        Self {
            repo,
            ttl,
            store_timeout,
        }
    }

    pub fn from_config(repo: Arc<R>, config: &AuthConfig) -> Self {
        Self::new(repo, config.refresh_token_ttl, config.store_timeout)
    }

    /// Issue and persist a fresh token for `user_id`
    pub async fn issue(&self, user_id: &UserId) -> AuthResult<String> {
        let record = RefreshToken::new(platform::crypto::random_token_hex(), *user_id, self.ttl);
        bounded(self.store_timeout, self.repo.insert(&record)).await?;

        tracing::debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token issued");
        Ok(record.token)
    }

    pub async fn lookup(&self, token: &str) -> AuthResult<RefreshToken> {
        bounded(self.store_timeout, self.repo.find_by_token(token))
            .await?
            .ok_or(AuthError::RefreshTokenNotFound)
    }

    /// Resolve a token to its user, checking revocation before expiry
    pub async fn validate(&self, token: &str) -> AuthResult<UserId> {
        let record = self.lookup(token).await?;

        if record.is_revoked() {
            return Err(AuthError::Revoked);
        }
        if record.is_expired_at(Utc::now()) {
            return Err(AuthError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revoke a token
    ///
    /// Unknown and already revoked tokens succeed silently.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let flipped = bounded(self.store_timeout, self.repo.revoke(token, Utc::now())).await?;

        if flipped {
            tracing::debug!("Refresh token revoked");
        } else {
            tracing::debug!("Revoke was a no-op (unknown or already revoked)");
        }
        Ok(())
    }

    /// Delete every record that has expired
    pub async fn purge_expired(&self) -> AuthResult<u64> {
        let deleted = bounded(self.store_timeout, self.repo.delete_expired(Utc::now())).await?;
        tracing::info!(deleted, "Purged expired refresh tokens");
        Ok(deleted)
    }
}
