//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the pure
//! token and ownership services.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{chirp::Chirp, refresh_token::RefreshToken, user::User};
pub use repository::{ChirpRepository, RefreshTokenRepository, UserRepository};
pub use service::{AccessTokenCodec, check_ownership};
