//! Request credential extraction
//!
//! Parses bearer tokens and API keys out of request headers. Pure parsing:
//! no I/O and nothing is validated beyond shape.

use axum::http::{HeaderMap, HeaderName, header};

use crate::crypto::{constant_time_eq, sha256};

/// Dedicated header for machine callers, `ApiKey: <key>`
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Missing API key")]
    MissingKey,
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme must be exactly `Bearer`, followed by one space and a
/// non-empty token containing no whitespace.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CredentialError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| scheme_credential(value, BEARER_SCHEME))
        .ok_or(CredentialError::MissingToken)
}

/// Extract a machine caller's API key
///
/// Accepts either `Authorization: ApiKey <key>` or a dedicated
/// `ApiKey: <key>` header. The `Authorization` form wins when both are set.
pub fn api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    let from_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| scheme_credential(value, API_KEY_SCHEME));

    if let Some(key) = from_authorization {
        return Ok(key);
    }

    headers
        .get(&API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(CredentialError::MissingKey)
}

/// Compare a presented API key against the configured one
///
/// Both sides are digested first so neither the content nor the length of
/// the configured key influences timing.
pub fn verify_api_key(presented: &str, expected: &str) -> bool {
    constant_time_eq(
        &sha256(presented.as_bytes()),
        &sha256(expected.as_bytes()),
    )
}

fn scheme_credential<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let (found_scheme, credential) = value.split_once(' ')?;
    if found_scheme != scheme {
        return None;
    }
    if credential.is_empty() || credential.chars().any(char::is_whitespace) {
        return None;
    }
    Some(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        let headers = with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(CredentialError::MissingToken)
        );
    }

    #[test]
    fn test_bearer_token_malformed() {
        for value in [
            "abc.def.ghi",
            "Bearer",
            "Bearer ",
            "bearer abc",
            "Basic dXNlcjpwYXNz",
            "Bearer  abc",
            "Bearer abc def",
        ] {
            let headers = with_authorization(value);
            assert_eq!(
                bearer_token(&headers),
                Err(CredentialError::MissingToken),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_api_key_from_authorization() {
        let headers = with_authorization("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(api_key(&headers), Ok("f271c81ff7084ee5b99a5091b42d486e"));
    }

    #[test]
    fn test_api_key_from_dedicated_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret-key"));
        assert_eq!(api_key(&headers), Ok("secret-key"));
    }

    #[test]
    fn test_api_key_missing() {
        assert_eq!(api_key(&HeaderMap::new()), Err(CredentialError::MissingKey));

        // A bearer token is not an API key
        let headers = with_authorization("Bearer abc");
        assert_eq!(api_key(&headers), Err(CredentialError::MissingKey));

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(api_key(&headers), Err(CredentialError::MissingKey));
    }

    #[test]
    fn test_verify_api_key() {
        assert!(verify_api_key("secret-key", "secret-key"));
        assert!(!verify_api_key("secret-kex", "secret-key"));
        assert!(!verify_api_key("secret", "secret-key"));
        assert!(!verify_api_key("", "secret-key"));
    }
}
