//! Session Service
//!
//! Login, refresh and logout. A login walks through
//! [`LoginStage`] in order; any failure aborts it and nothing partial is
//! returned to the caller.

use std::fmt;
use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::blocking::off_runtime;
use crate::application::config::AuthConfig;
use crate::application::ledger::RefreshTokenLedger;
use crate::application::store::bounded;
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::service::AccessTokenCodec;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Progress of a single login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    ReceivedCredentials,
    PasswordVerified,
    TokensMinted,
    RefreshPersisted,
    SessionIssued,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoginStage::ReceivedCredentials => "received_credentials",
            LoginStage::PasswordVerified => "password_verified",
            LoginStage::TokensMinted => "tokens_minted",
            LoginStage::RefreshPersisted => "refresh_persisted",
            LoginStage::SessionIssued => "session_issued",
        };
        f.write_str(s)
    }
}

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Issued session
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for LoginOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginOutput")
            .field("user_id", &self.user.user_id)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

pub struct SessionService<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    ledger: RefreshTokenLedger<R>,
    codec: AccessTokenCodec,
    hasher: Arc<PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<U, R> SessionService<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        codec: AccessTokenCodec,
        hasher: Arc<PasswordHasher>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            ledger: RefreshTokenLedger::from_config(token_repo, &config),
            codec,
            hasher,
            config,
        }
    }

    pub fn ledger(&self) -> &RefreshTokenLedger<R> {
        &self.ledger
    }

    /// Exchange email and password for an access/refresh token pair
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`,
    /// and both pay for one password verification.
    pub async fn login(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let mut stage = LoginStage::ReceivedCredentials;
        let password = ClearTextPassword::for_verification(input.password);

        let result = self.run_login(&input.email, password, &mut stage).await;
        if let Err(e) = &result {
            tracing::debug!(stage = %stage, error = %e, "Login aborted");
        }
        result
    }

    async fn run_login(
        &self,
        email: &str,
        password: ClearTextPassword,
        stage: &mut LoginStage,
    ) -> AuthResult<LoginOutput> {
        let user = match Email::new(email) {
            Ok(email) => {
                bounded(self.config.store_timeout, self.user_repo.find_by_email(&email)).await?
            }
            Err(_) => None,
        };

        let hasher = self.hasher.clone();
        let Some(user) = user else {
            off_runtime(move || {
                hasher.verify_decoy(&password);
                Ok(())
            })
            .await?;
            return Err(AuthError::InvalidCredentials);
        };

        let stored = user.password_hash.clone();
        let verdict =
            off_runtime(move || hasher.verify(&password, &stored).map_err(AuthError::from)).await?;
        if !verdict.is_match() {
            return Err(AuthError::InvalidCredentials);
        }
        *stage = LoginStage::PasswordVerified;

        let access_token = self.codec.mint(&user.user_id, self.config.access_token_ttl)?;
        *stage = LoginStage::TokensMinted;

        let refresh_token = self.ledger.issue(&user.user_id).await?;
        *stage = LoginStage::RefreshPersisted;
        tracing::trace!(user_id = %user.user_id, stage = %stage, "Refresh token stored");

        *stage = LoginStage::SessionIssued;
        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from a refresh token
    ///
    /// Every ledger outcome other than success collapses to `Unauthorized`;
    /// the refresh token itself is left untouched.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        let user_id = self.ledger.validate(refresh_token).await.map_err(|e| {
            tracing::debug!(error = %e, "Refresh rejected");
            AuthError::Unauthorized
        })?;

        let access_token = self.codec.mint(&user_id, self.config.access_token_ttl)?;
        tracing::debug!(user_id = %user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token; unknown or already revoked tokens succeed
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        self.ledger.revoke(refresh_token).await
    }
}
