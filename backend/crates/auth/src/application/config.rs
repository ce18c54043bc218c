//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration as StdDuration;

use chrono::Duration;
use zeroize::Zeroizing;

/// Issuer claim written into, and required from, every access token
pub const DEFAULT_TOKEN_ISSUER: &str = "chirpy";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing key for access tokens
    pub access_token_secret: Zeroizing<Vec<u8>>,
    pub token_issuer: String,
    /// Shared key expected from the payment provider's webhooks
    pub api_key: Zeroizing<String>,
    /// Access token lifetime (1 hour)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (60 days)
    pub refresh_token_ttl: Duration,
    /// Upper bound for any single ledger/store call
    pub store_timeout: StdDuration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Zeroizing::new(Vec::new()),
            token_issuer: DEFAULT_TOKEN_ISSUER.to_string(),
            api_key: Zeroizing::new(String::new()),
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(60),
            store_timeout: StdDuration::from_secs(5),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret and API key
    pub fn with_random_secret() -> Self {
        Self {
            access_token_secret: Zeroizing::new(platform::crypto::random_bytes(32)),
            api_key: Zeroizing::new(platform::crypto::random_token_hex()),
            ..Default::default()
        }
    }

    /// Create config for development (short timeouts, random secrets)
    pub fn development() -> Self {
        Self {
            store_timeout: StdDuration::from_secs(2),
            ..Self::with_random_secret()
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("token_issuer", &self.token_issuer)
            .field("api_key", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("store_timeout", &self.store_timeout)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::seconds(3600));
        assert_eq!(config.refresh_token_ttl, Duration::days(60));
        assert_eq!(config.token_issuer, "chirpy");
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.access_token_secret.len(), 32);
        assert_ne!(*a.access_token_secret, *b.access_token_secret);
        assert_ne!(*a.api_key, *b.api_key);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            api_key: Zeroizing::new("f271c81ff7084ee5b99a5091b42d486e".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("f271c81ff7084ee5b99a5091b42d486e"));
    }
}
