//! Sign-in, sign-up and current-user endpoints.

use crate::{
    api::AppState,
    auth::{Credentials, Session, SignUp, User},
    errors::{Error, Result},
};
use axum::{Extension, Json, extract::State};

fn check_credentials(credentials: &Credentials) -> Result<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(Error::validation("Email and password are required"));
    }
    Ok(())
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>> {
    check_credentials(&credentials)?;
    let session = state.auth.sign_in_with_password(&credentials).await?;
    Ok(Json(session))
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SignUp>> {
    check_credentials(&credentials)?;
    let outcome = state.auth.sign_up(&credentials).await?;
    Ok(Json(outcome))
}

/// `GET /api/me`
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
