//! Chirp Entity
//!
//! The resource guarded by ownership checks. `user_id` is always the
//! authenticated author, never a client-supplied value.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{ChirpId, UserId, chirp_body::ChirpBody};

#[derive(Debug, Clone)]
pub struct Chirp {
    pub chirp_id: ChirpId,
    pub body: ChirpBody,
    /// Owner
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chirp {
    pub fn new(author: UserId, body: ChirpBody) -> Self {
        let now = Utc::now();

        Self {
            chirp_id: ChirpId::new(),
            body,
            user_id: author,
            created_at: now,
            updated_at: now,
        }
    }
}
