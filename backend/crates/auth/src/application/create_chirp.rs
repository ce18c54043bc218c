//! Create Chirp Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::store::bounded;
use crate::domain::entity::chirp::Chirp;
use crate::domain::repository::ChirpRepository;
use crate::domain::value_object::{UserId, chirp_body::ChirpBody};
use crate::error::AuthResult;

pub struct CreateChirpUseCase<C>
where
    C: ChirpRepository,
{
    chirp_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> CreateChirpUseCase<C>
where
    C: ChirpRepository,
{
    pub fn new(chirp_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self { chirp_repo, config }
    }

    /// The author is always the authenticated subject
    pub async fn execute(&self, author: &UserId, body: String) -> AuthResult<Chirp> {
        let body = ChirpBody::new(body)?;
        let chirp = Chirp::new(*author, body);

        bounded(self.config.store_timeout, self.chirp_repo.create(&chirp)).await?;

        tracing::info!(chirp_id = %chirp.chirp_id, user_id = %author, "Chirp created");
        Ok(chirp)
    }
}
