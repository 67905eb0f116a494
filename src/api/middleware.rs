//! Bearer-token authentication for the protected API routes.

use crate::{
    api::AppState,
    errors::{Error, Result},
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token to a user through the auth provider and stores
/// the [`User`](crate::auth::User) in the request extensions.
///
/// Requests without a valid token never reach the handler.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())
        .map(str::to_string)
        .ok_or_else(|| Error::Unauthorized {
            message: "Missing bearer token".to_string(),
        })?;

    let user = state.auth.get_user(&token).await?;
    debug!(user_id = %user.id, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
