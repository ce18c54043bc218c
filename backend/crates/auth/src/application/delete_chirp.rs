//! Delete Chirp Use Case
//!
//! Fetch, check ownership, then delete. A denied request performs no
//! write at all.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::repository::ChirpRepository;
use crate::domain::service::check_ownership;
use crate::domain::value_object::{ChirpId, UserId};
use crate::error::{AuthError, AuthResult};

pub struct DeleteChirpUseCase<C>
where
    C: ChirpRepository,
{
    chirp_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> DeleteChirpUseCase<C>
where
    C: ChirpRepository,
{
    pub fn new(chirp_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self { chirp_repo, config }
    }

    pub async fn execute(&self, subject: &UserId, chirp_id: &ChirpId) -> AuthResult<()> {
        let chirp = bounded(self.config.store_timeout, self.chirp_repo.find_by_id(chirp_id))
            .await?
            .ok_or(AuthError::ChirpNotFound)?;

        if let Err(e) = check_ownership(subject, &chirp.user_id) {
            tracing::warn!(
                chirp_id = %chirp_id,
                user_id = %subject,
                owner_id = %chirp.user_id,
                "Refused to delete chirp owned by another user"
            );
            return Err(e);
        }

        let deleted = bounded(self.config.store_timeout, self.chirp_repo.delete(chirp_id)).await?;
        if !deleted {
            // Removed concurrently between fetch and delete
            return Err(AuthError::ChirpNotFound);
        }

        tracing::info!(chirp_id = %chirp_id, user_id = %subject, "Chirp deleted");
        Ok(())
    }
}
