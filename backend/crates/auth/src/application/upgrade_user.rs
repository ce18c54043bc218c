//! Upgrade User Use Case
//!
//! Handles the payment provider's webhook. The caller is a machine
//! authenticated by the shared API key, not a user.

use std::sync::Arc;

use platform::credentials::verify_api_key;

use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// The only event that changes state
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

pub struct WebhookInput {
    pub event: String,
    pub user_id: String,
}

/// What a webhook delivery did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Upgraded(UserId),
    /// Authenticated but not an event we act on
    Ignored,
}

pub struct UpgradeUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> UpgradeUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Check the presented key before anything in the delivery is read
    pub fn authorize(&self, presented_key: &str) -> AuthResult<()> {
        if !verify_api_key(presented_key, &self.config.api_key) {
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }

    pub async fn execute(&self, presented_key: &str, input: WebhookInput) -> AuthResult<WebhookOutcome> {
        self.authorize(presented_key)?;

        if input.event != USER_UPGRADED_EVENT {
            tracing::debug!(event = %input.event, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored);
        }

        let user_id: UserId = input
            .user_id
            .parse()
            .map_err(|_| AuthError::Validation("Invalid user_id".into()))?;

        let updated =
            bounded(self.config.store_timeout, self.user_repo.mark_chirpy_red(&user_id)).await?;
        if !updated {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(WebhookOutcome::Upgraded(user_id))
    }
}
