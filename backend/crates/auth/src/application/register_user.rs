//! Register User Use Case
//!
//! Creates a new account from an email and password.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::blocking::off_runtime;
use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct RegisterUserInput {
    pub email: String,
    pub password: String,
}

pub struct RegisterUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUserUseCase<U>
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

    pub async fn execute(&self, input: RegisterUserInput) -> AuthResult<User> {
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        let existing =
            bounded(self.config.store_timeout, self.user_repo.find_by_email(&email)).await?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let password_hash = off_runtime(move || hasher.hash(&password).map_err(AuthError::from)).await?;
        let user = User::new(email, password_hash);

        // A concurrent registration can still race past the lookup; the
        // unique constraint reports it as EmailTaken.
        bounded(self.config.store_timeout, self.user_repo.create(&user)).await?;

        tracing::info!(user_id = %user.user_id, "User registered");
        Ok(user)
    }
}
