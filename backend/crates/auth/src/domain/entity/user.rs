//! User Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{UserId, email::Email};

/// User entity
///
/// The auth core reads `user_id` and `password_hash`; the only flag it
/// writes on its own is `is_chirpy_red` (via the payment webhook).
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    /// Paid tier ("Chirpy Red"), set by the payment provider
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace login credentials
    pub fn change_credentials(&mut self, email: Email, password_hash: HashedPassword) {
        self.email = email;
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
