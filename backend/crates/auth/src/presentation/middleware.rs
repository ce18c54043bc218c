//! Auth Middleware
//!
//! Middleware for requiring a valid access token on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::credentials::bearer_token;

use crate::domain::service::AccessTokenCodec;
use crate::domain::value_object::UserId;
use crate::error::AuthError;

/// Subject of a verified access token, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that requires `Authorization: Bearer <access token>`
///
/// Runs before any body extraction, so an unauthenticated request is
/// rejected before its payload is looked at.
pub async fn require_access_token(
    State(codec): State<AccessTokenCodec>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;
    let user_id = codec.validate(token)?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}
