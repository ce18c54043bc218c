//! Chirp Body Value Object

use crate::error::{AuthError, AuthResult};

/// Maximum chirp length, counted in characters
pub const CHIRP_MAX_LENGTH: usize = 140;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChirpBody(String);

impl ChirpBody {
    pub fn new(body: impl Into<String>) -> AuthResult<Self> {
        let body = body.into();

        if body.trim().is_empty() {
            return Err(AuthError::Validation("Chirp cannot be empty".into()));
        }

        let actual = body.chars().count();
        if actual > CHIRP_MAX_LENGTH {
            return Err(AuthError::ChirpTooLong {
                max: CHIRP_MAX_LENGTH,
                actual,
            });
        }

        Ok(Self(body))
    }

    pub fn from_db(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limit_is_inclusive() {
        assert!(ChirpBody::new("a".repeat(CHIRP_MAX_LENGTH)).is_ok());
        assert!(matches!(
            ChirpBody::new("a".repeat(CHIRP_MAX_LENGTH + 1)),
            Err(AuthError::ChirpTooLong { max: 140, actual: 141 })
        ));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(ChirpBody::new("é".repeat(CHIRP_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(ChirpBody::new("  "), Err(AuthError::Validation(_))));
    }
}
