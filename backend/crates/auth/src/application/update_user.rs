//! Update User Use Case
//!
//! Replaces the authenticated user's email and password.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::blocking::off_runtime;
use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

pub struct UpdateUserInput {
    pub email: String,
    pub password: String,
}

pub struct UpdateUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<PasswordHasher>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            hasher,
            config,
        }
    }

    /// `subject` is the access token's subject and the only user touched
    pub async fn execute(&self, subject: &UserId, input: UpdateUserInput) -> AuthResult<User> {
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        let mut user = bounded(self.config.store_timeout, self.user_repo.find_by_id(subject))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email != email {
            let holder =
                bounded(self.config.store_timeout, self.user_repo.find_by_email(&email)).await?;
            if holder.is_some_and(|other| other.user_id != user.user_id) {
                return Err(AuthError::EmailTaken);
            }
        }

        let hasher = self.hasher.clone();
        let password_hash = off_runtime(move || hasher.hash(&password).map_err(AuthError::from)).await?;
        user.change_credentials(email, password_hash);
        bounded(self.config.store_timeout, self.user_repo.update(&user)).await?;

        tracing::info!(user_id = %user.user_id, "User credentials updated");
        Ok(user)
    }
}
