//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, salted per call)
//! - Zeroization of clear text passwords
//! - Constant-time verification (delegated to the argon2 verifier)
//! - Optional application pepper
//!
//! A wrong password is an ordinary outcome ([`PasswordMatch::Mismatch`]),
//! not an error. Errors are reserved for the hashing machinery itself.

use std::fmt;

use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _, password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted at registration
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Registration-time password policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed (entropy or resource failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for registration or password change, enforcing policy
    ///
    /// Unicode is NFKC-normalized before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Create a password for verification only (login)
    ///
    /// No policy is applied: a login attempt with a too-short password is
    /// simply a mismatch, and must not reveal the policy.
    pub fn for_verification(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count code points, not bytes
        let char_count = self.0.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if self
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, params, salt, hash)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Outcome of a password verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    Match,
    Mismatch,
}

impl PasswordMatch {
    pub fn is_match(self) -> bool {
        matches!(self, PasswordMatch::Match)
    }
}

/// One-way credential hashing with an optional pepper
///
/// Immutable after construction, so a single instance can be shared across
/// request tasks. Construction pays for one hash to build the decoy.
pub struct PasswordHasher {
    pepper: Option<Zeroizing<Vec<u8>>>,
    decoy: Option<HashedPassword>,
}

impl PasswordHasher {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        let mut hasher = Self {
            pepper: pepper.map(Zeroizing::new),
            decoy: None,
        };

        let seed = ClearTextPassword::for_verification(crate::crypto::random_token_hex());
        hasher.decoy = hasher.hash(&seed).ok();
        hasher
    }

    /// Hash with a fresh random salt (128 bits)
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let input = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);

        // OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let hash = Argon2::default()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        hashed: &HashedPassword,
    ) -> Result<PasswordMatch, PasswordHashError> {
        let parsed =
            PasswordHash::new(&hashed.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        let input = self.peppered(password);

        match Argon2::default().verify_password(&input, &parsed) {
            Ok(()) => Ok(PasswordMatch::Match),
            Err(argon2::password_hash::Error::Password) => Ok(PasswordMatch::Mismatch),
            Err(e) => Err(PasswordHashError::HashingFailed(e.to_string())),
        }
    }

    /// Burn the same work as a real verification against a decoy hash
    ///
    /// Used when the account does not exist, so unknown-email and
    /// wrong-password attempts take comparable time.
    pub fn verify_decoy(&self, password: &ClearTextPassword) {
        if let Some(decoy) = &self.decoy {
            let _ = self.verify(password, decoy);
        }
    }

    fn peppered(&self, password: &ClearTextPassword) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(password.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        combined
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::for_verification(s.to_string())
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_for_verification_skips_policy() {
        let hasher = PasswordHasher::default();
        let hashed = hasher.hash(&pw("x")).unwrap();
        assert_eq!(hasher.verify(&pw("x"), &hashed).unwrap(), PasswordMatch::Match);
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::default();
        let hashed = hasher.hash(&pw("04234cool-password")).unwrap();

        assert_eq!(
            hasher.verify(&pw("04234cool-password"), &hashed).unwrap(),
            PasswordMatch::Match
        );
        assert_eq!(
            hasher.verify(&pw("04234cool-passwore"), &hashed).unwrap(),
            PasswordMatch::Mismatch
        );
    }

    #[test]
    fn test_same_password_hashes_differ() {
        let hasher = PasswordHasher::default();
        let a = hasher.hash(&pw("same-password")).unwrap();
        let b = hasher.hash(&pw("same-password")).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = PasswordHasher::new(Some(b"my_secret_pepper".to_vec()));
        let hashed = peppered.hash(&pw("TestPassword123!")).unwrap();

        assert!(peppered.verify(&pw("TestPassword123!"), &hashed).unwrap().is_match());

        let plain = PasswordHasher::default();
        assert!(!plain.verify(&pw("TestPassword123!"), &hashed).unwrap().is_match());
    }

    #[test]
    fn test_nfkc_normalization_matches() {
        let hasher = PasswordHasher::default();
        // U+FB01 (ligature fi) normalizes to "fi"
        let hashed = hasher.hash(&pw("\u{FB01}ne-password")).unwrap();
        assert!(hasher.verify(&pw("fine-password"), &hashed).unwrap().is_match());
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = PasswordHasher::default();
        let hashed = hasher.hash(&pw("TestPassword123!")).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&pw("TestPassword123!"), &restored).unwrap().is_match());
    }

    #[test]
    fn test_invalid_phc_string() {
        let result = HashedPassword::from_phc_string("not_a_valid_hash");
        assert!(matches!(result, Err(PasswordHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_decoy_is_ready_before_first_use() {
        let hasher = PasswordHasher::default();
        assert!(hasher.decoy.is_some());

        let decoy = hasher.decoy.clone().unwrap();
        hasher.verify_decoy(&pw("anything"));
        assert_eq!(hasher.decoy.as_ref(), Some(&decoy));
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", pw("secret"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
