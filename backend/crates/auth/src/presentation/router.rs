//! Auth Router

use axum::{
    Router, middleware,
    routing::{delete, post, put},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{ChirpRepository, RefreshTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
///
/// Paths are relative; the binary nests this router under `/api`.
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + RefreshTokenRepository + ChirpRepository + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, config);
    let auth = middleware::from_fn_with_state(state.codec.clone(), require_access_token);

    Router::new()
        .route(
            "/users",
            post(handlers::register::<R>)
                .merge(put(handlers::update_user::<R>).route_layer(auth.clone())),
        )
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/revoke", post(handlers::revoke::<R>))
        .route(
            "/chirps",
            post(handlers::create_chirp::<R>).route_layer(auth.clone()),
        )
        .route(
            "/chirps/{chirp_id}",
            delete(handlers::delete_chirp::<R>).route_layer(auth),
        )
        .route("/polka/webhooks", post(handlers::payment_webhook::<R>))
        .with_state(state)
}
