//! Auth (Session and Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, token codec
//! - `application/` - Use cases, session service, refresh token ledger
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password login issuing an access/refresh token pair
//! - Stateless HS256 access tokens, persisted revocable refresh tokens
//! - Ownership checks on chirp deletion
//! - API-key authenticated payment webhook
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, constant-time verification
//! - Unknown email and wrong password are indistinguishable
//! - Every authentication failure renders the same 401
//! - Store calls are bounded by a timeout

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::ledger::RefreshTokenLedger;
pub use domain::service::AccessTokenCodec;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
