//! Access Token Codec
//!
//! Stateless HS256 JWTs. Validity is fully determined by the signature and
//! the clock. The codec never touches the store and holds no mutable state,
//! so a single instance is shared across all request tasks.
//!
//! `jsonwebtoken` verifies the signature before it looks at any claim. The
//! claim checks it then runs are ordered expiry first, issuer second, so the
//! overall order is signature, expiry, structure.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    issuer: Arc<str>,
}

impl AccessTokenCodec {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        let issuer: String = issuer.into();

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_issuer(&[&issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            validation: Arc::new(validation),
            issuer: Arc::from(issuer),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.access_token_secret, config.token_issuer.clone())
    }

    /// Mint a token for `subject` valid for `ttl` from now
    pub fn mint(&self, subject: &UserId, ttl: Duration) -> AuthResult<String> {
        self.mint_at(subject, ttl, Utc::now())
    }

    /// Mint with an explicit issuance instant
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn mint_at(
        &self,
        subject: &UserId,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = AccessClaims {
            iss: self.issuer.to_string(),
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {e}")))
    }

    /// Validate a token and return its subject
    pub fn validate(&self, token: &str) -> AuthResult<UserId> {
        self.validate_at(token, Utc::now())
    }

    /// Validate against an explicit clock
    ///
    /// The wall-clock expiry check inside `decode` still applies, so `now`
    /// can only move the cutoff earlier.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<UserId> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?
            .claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        if claims.iat > claims.exp {
            return Err(AuthError::MalformedToken);
        }

        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        JwtErrorKind::InvalidSignature => AuthError::InvalidSignature,
        JwtErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::MalformedToken,
    }
}

impl std::fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::{from_base64_url, to_base64_url};
    use serde_json::json;

    const SECRET: &[u8] = b"test-signing-secret-of-some-length";

    fn codec() -> AccessTokenCodec {
        AccessTokenCodec::new(SECRET, "chirpy")
    }

    /// Sign arbitrary claims with the test secret
    fn forge(alg: Algorithm, claims: serde_json::Value) -> String {
        encode(&Header::new(alg), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn test_mint_then_validate() {
        let codec = codec();
        let subject = UserId::new();
        let token = codec.mint(&subject, Duration::hours(1)).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.validate(&token).unwrap(), subject);
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let codec = codec();
        let subject = UserId::new();
        let at = Utc::now();

        let a = codec.mint_at(&subject, Duration::hours(1), at).unwrap();
        let b = codec.mint_at(&subject, Duration::hours(1), at).unwrap();
        assert_eq!(a, b);
        assert_eq!(codec.validate_at(&a, at).unwrap(), subject);
    }

    #[test]
    fn test_already_expired() {
        let codec = codec();
        let token = codec.mint(&UserId::new(), Duration::seconds(-1)).unwrap();
        assert!(matches!(codec.validate(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_expires_after_ttl() {
        let codec = codec();
        let at = Utc::now();
        let token = codec.mint_at(&UserId::new(), Duration::hours(1), at).unwrap();

        assert!(codec.validate_at(&token, at + Duration::minutes(59)).is_ok());
        assert!(matches!(
            codec.validate_at(&token, at + Duration::hours(1)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_every_signature_bit_flip_is_rejected() {
        let codec = codec();
        let token = codec.mint(&UserId::new(), Duration::hours(1)).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let signature = from_base64_url(signature).unwrap();

        for byte in 0..signature.len() {
            for bit in 0..8 {
                let mut mutated = signature.clone();
                mutated[byte] ^= 1 << bit;
                let tampered = format!("{}.{}", signing_input, to_base64_url(&mutated));
                assert!(
                    matches!(codec.validate(&tampered), Err(AuthError::InvalidSignature)),
                    "flip of byte {byte} bit {bit} was accepted"
                );
            }
        }
    }

    #[test]
    fn test_tampered_claims_rejected_by_signature() {
        let codec = codec();
        let token = codec.mint(&UserId::new(), Duration::hours(1)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let other = json!({"iss": "chirpy", "sub": UserId::new().to_string(), "iat": 0, "exp": 9999999999i64});
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            to_base64_url(other.to_string().as_bytes()),
            parts[2]
        );
        assert!(matches!(
            codec.validate(&tampered),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = codec().mint(&UserId::new(), Duration::hours(1)).unwrap();
        let other = AccessTokenCodec::new(b"another-secret", "chirpy");
        assert!(matches!(
            other.validate(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let token = codec().mint(&UserId::new(), Duration::seconds(-60)).unwrap();
        let other = AccessTokenCodec::new(b"another-secret", "chirpy");
        assert!(matches!(
            other.validate(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_no_signature_segment() {
        assert!(matches!(
            codec().validate("not-a-token"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(codec().validate(""), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn test_signed_but_malformed_claims() {
        let codec = codec();
        let far = 9999999999i64;

        let not_uuid = forge(
            Algorithm::HS256,
            json!({"iss": "chirpy", "sub": "walt", "iat": 1, "exp": far}),
        );
        assert!(matches!(codec.validate(&not_uuid), Err(AuthError::MalformedToken)));

        let wrong_issuer = forge(
            Algorithm::HS256,
            json!({"iss": "other", "sub": UserId::new().to_string(), "iat": 1, "exp": far}),
        );
        assert!(matches!(codec.validate(&wrong_issuer), Err(AuthError::MalformedToken)));

        let wrong_alg = forge(
            Algorithm::HS512,
            json!({"iss": "chirpy", "sub": UserId::new().to_string(), "iat": 1, "exp": far}),
        );
        assert!(matches!(codec.validate(&wrong_alg), Err(AuthError::MalformedToken)));

        let missing_exp = forge(Algorithm::HS256, json!({"iss": "chirpy", "sub": "x", "iat": 1}));
        assert!(matches!(codec.validate(&missing_exp), Err(AuthError::MalformedToken)));

        let issued_after_expiry = forge(
            Algorithm::HS256,
            json!({"iss": "chirpy", "sub": UserId::new().to_string(), "iat": far, "exp": far - 1}),
        );
        assert!(matches!(
            codec.validate(&issued_after_expiry),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_expiry_checked_before_structure() {
        let codec = codec();

        let expired_and_bad_sub = forge(
            Algorithm::HS256,
            json!({"iss": "chirpy", "sub": "walt", "iat": 1, "exp": 2}),
        );
        assert!(matches!(
            codec.validate(&expired_and_bad_sub),
            Err(AuthError::Expired)
        ));

        let expired_and_wrong_issuer = forge(
            Algorithm::HS256,
            json!({"iss": "other", "sub": UserId::new().to_string(), "iat": 1, "exp": 2}),
        );
        assert!(matches!(
            codec.validate(&expired_and_wrong_issuer),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", codec());
        assert!(!debug.contains("test-signing-secret"));
    }
}
