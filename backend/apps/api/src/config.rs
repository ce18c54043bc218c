//! Server configuration from the environment

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use zeroize::Zeroizing;

const DEV_PLATFORM: &str = "dev";

pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `dev` enables destructive admin endpoints
    pub platform: String,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load from process environment (after `.env` has been applied)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |name: &str| -> anyhow::Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("{name} must be set"),
            }
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = Zeroizing::new(required("JWT_SECRET")?);
        let polka_key = required("POLKA_KEY")?;

        let access_ttl_secs: i64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECS", 3600)?;
        let refresh_ttl_days: i64 = parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 60)?;
        let store_timeout_ms: u64 = parse_or(&lookup, "STORE_TIMEOUT_MS", 5000)?;
        let bind_addr: SocketAddr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
        )?;

        if access_ttl_secs <= 0 || refresh_ttl_days <= 0 {
            bail!("Token lifetimes must be positive");
        }

        let auth = AuthConfig {
            access_token_secret: Zeroizing::new(jwt_secret.as_bytes().to_vec()),
            api_key: Zeroizing::new(polka_key),
            access_token_ttl: chrono::Duration::seconds(access_ttl_secs),
            refresh_token_ttl: chrono::Duration::days(refresh_ttl_days),
            store_timeout: StdDuration::from_millis(store_timeout_ms),
            ..AuthConfig::default()
        };

        Ok(Self {
            database_url,
            bind_addr,
            platform: lookup("PLATFORM").unwrap_or_default(),
            auth,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/chirpy"),
        ("JWT_SECRET", "a-long-signing-secret"),
        ("POLKA_KEY", "f271c81ff7084ee5b99a5091b42d486e"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.auth.access_token_ttl, chrono::Duration::hours(1));
        assert_eq!(config.auth.refresh_token_ttl, chrono::Duration::days(60));
        assert_eq!(config.auth.store_timeout, StdDuration::from_secs(5));
        assert_eq!(config.auth.access_token_secret.as_slice(), b"a-long-signing-secret");
        assert!(!config.is_dev());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PLATFORM", "dev"),
            ("ACCESS_TOKEN_TTL_SECS", "60"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&vars)).unwrap();

        assert!(config.is_dev());
        assert_eq!(config.auth.access_token_ttl, chrono::Duration::seconds(60));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_missing_secret() {
        let vars = [REQUIRED[0], REQUIRED[2]];
        assert!(ServerConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_invalid_number() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("STORE_TIMEOUT_MS", "soon"));
        assert!(ServerConfig::from_lookup(lookup(&vars)).is_err());
    }
}
