//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no knowledge of users or sessions:
//! - Cryptographic utilities (SHA-256, Base64url, random tokens)
//! - Password hashing (Argon2id)
//! - Credential extraction from request headers (Bearer / ApiKey)

pub mod credentials;
pub mod crypto;
pub mod password;
