//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every write is a single statement so the store's row-level atomicity
//! serializes conflicting writes, even across processes.

use chrono::{DateTime, Utc};

use crate::domain::entity::{chirp::Chirp, refresh_token::RefreshToken, user::User};
use crate::domain::value_object::{ChirpId, UserId, email::Email};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user (`EmailTaken` on duplicate email)
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Update email, password hash and `updated_at`
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Set the paid-tier flag on exactly one user
    ///
    /// Returns `false` when no such user exists.
    async fn mark_chirpy_red(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Refresh token ledger storage
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> AuthResult<()>;

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>>;

    /// Revoke if not already revoked
    ///
    /// Returns `true` only when this call flipped the record.
    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> AuthResult<bool>;

    /// Delete records whose expiry is at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}

/// Chirp repository trait
#[trait_variant::make(ChirpRepository: Send)]
pub trait LocalChirpRepository {
    async fn create(&self, chirp: &Chirp) -> AuthResult<()>;

    async fn find_by_id(&self, chirp_id: &ChirpId) -> AuthResult<Option<Chirp>>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, chirp_id: &ChirpId) -> AuthResult<bool>;
}
