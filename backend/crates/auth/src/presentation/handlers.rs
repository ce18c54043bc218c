//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use platform::credentials::{api_key, bearer_token};
use platform::password::PasswordHasher;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CreateChirpUseCase, DeleteChirpUseCase, LoginInput, RegisterUserInput, RegisterUserUseCase,
    SessionService, UpdateUserInput, UpdateUserUseCase, UpgradeUserUseCase, WebhookInput,
    WebhookOutcome,
};
use crate::domain::repository::{ChirpRepository, RefreshTokenRepository, UserRepository};
use crate::domain::service::AccessTokenCodec;
use crate::domain::value_object::ChirpId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChirpResponse, CreateChirpRequest, CredentialsRequest, LoginResponse, RefreshResponse,
    UserResponse, WebhookRequest,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub codec: AccessTokenCodec,
    pub hasher: Arc<PasswordHasher>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let codec = AccessTokenCodec::from_config(&config);
        let hasher = Arc::new(PasswordHasher::new(config.password_pepper.clone()));

        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            codec,
            hasher,
        }
    }

    fn session(&self) -> SessionService<R, R> {
        SessionService::new(
            self.repo.clone(),
            self.repo.clone(),
            self.codec.clone(),
            self.hasher.clone(),
            self.config.clone(),
        )
    }
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            codec: self.codec.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/users
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let use_case =
        RegisterUserUseCase::new(state.repo.clone(), state.hasher.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterUserInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /api/users
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let use_case =
        UpdateUserUseCase::new(state.repo.clone(), state.hasher.clone(), state.config.clone());

    let user = use_case
        .execute(
            &auth.user_id,
            UpdateUserInput {
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Session
// ============================================================================

/// POST /api/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let output = state
        .session()
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&output.user),
        token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

/// POST /api/refresh
///
/// The refresh token travels as a bearer credential.
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let refresh_token = bearer_token(&headers)?;
    let token = state.session().refresh(refresh_token).await?;

    Ok(Json(RefreshResponse { token }))
}

/// POST /api/revoke
pub async fn revoke<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let refresh_token = bearer_token(&headers)?;
    state.session().logout(refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Chirps
// ============================================================================

/// POST /api/chirps
pub async fn create_chirp<R>(
    State(state): State<AuthAppState<R>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CreateChirpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let use_case = CreateChirpUseCase::new(state.repo.clone(), state.config.clone());
    let chirp = use_case.execute(&auth.user_id, req.body).await?;

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(&chirp))))
}

/// DELETE /api/chirps/{chirp_id}
pub async fn delete_chirp<R>(
    State(state): State<AuthAppState<R>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let chirp_id: ChirpId = chirp_id
        .parse()
        .map_err(|_| AuthError::Validation("Invalid chirp ID".into()))?;

    let use_case = DeleteChirpUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(&auth.user_id, &chirp_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Payment Webhook
// ============================================================================

/// POST /api/polka/webhooks
///
/// The body is read as raw bytes so the API key is checked before any
/// parsing; an unauthenticated caller never learns the payload shape.
pub async fn payment_webhook<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let presented = api_key(&headers).map_err(|e| {
        tracing::debug!(error = %e, "Webhook without API key");
        AuthError::Unauthorized
    })?;

    let use_case = UpgradeUserUseCase::new(state.repo.clone(), state.config.clone());
    use_case.authorize(presented)?;

    let req: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AuthError::Validation(format!("Invalid webhook body: {e}")))?;

    let outcome = use_case
        .execute(
            presented,
            WebhookInput {
                event: req.event,
                user_id: req.data.user_id,
            },
        )
        .await?;

    match outcome {
        WebhookOutcome::Upgraded(user_id) => {
            tracing::debug!(user_id = %user_id, "Webhook applied");
        }
        WebhookOutcome::Ignored => {
            tracing::debug!("Webhook acknowledged without change");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
