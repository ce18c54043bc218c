//! API DTOs (Data Transfer Objects)
//!
//! Field names are snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{chirp::Chirp, user::User};
use crate::domain::value_object::{ChirpId, UserId};

// ============================================================================
// Users
// ============================================================================

/// Body of `POST /users` and `PUT /users`
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email.as_str().to_string(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Login response: the user plus a fresh token pair
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

// ============================================================================
// Chirps
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: ChirpId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: UserId,
}

impl From<&Chirp> for ChirpResponse {
    fn from(chirp: &Chirp) -> Self {
        Self {
            id: chirp.chirp_id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body.as_str().to_string(),
            user_id: chirp.user_id,
        }
    }
}

// ============================================================================
// Payment Webhook
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}
