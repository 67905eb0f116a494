//! Client for the hosted auth provider.
//!
//! Sign-in, sign-up and token verification are delegated to the provider over
//! HTTP. The ledger never stores passwords or issues tokens; it only forwards
//! credentials and asks who a bearer token belongs to.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

/// A user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Provider user id, stored as the owner of events and expenses
    pub id: String,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form profile metadata
    #[serde(default, rename = "user_metadata")]
    pub metadata: serde_json::Value,
}

/// Tokens returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for subsequent requests
    pub access_token: String,
    /// Token used to obtain a new access token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// The signed-in user
    pub user: User,
}

/// Outcome of a sign-up: a session when the provider confirms immediately,
/// otherwise just the pending user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignUp {
    /// Account confirmed and signed in
    Session(Session),
    /// Account created, confirmation pending
    User(User),
}

/// Email and password as posted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Email address
    pub email: String,
    /// Plain-text password, forwarded to the provider only
    pub password: String,
}

/// Operations the ledger needs from an auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchanges email and password for a session.
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session>;

    /// Registers a new account.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp>;

    /// Resolves a bearer token to its user.
    async fn get_user(&self, access_token: &str) -> Result<User>;
}

/// [`AuthProvider`] that talks to a hosted `/auth/v1` endpoint.
#[derive(Debug, Clone)]
pub struct HostedAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedAuth {
    /// Creates a client for the provider at `base_url` using the public API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }
}

/// Pulls the human-readable message out of a provider error body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl AuthProvider for HostedAuth {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let resp = self
            .http
            .post(self.url("token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() {
            debug!(%status, "Sign-in refused");
            return Err(Error::Unauthorized {
                message: "Invalid credentials".to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Auth provider failed during sign-in");
            return Err(Error::AuthProvider {
                message: format!("sign-in failed ({status}): {}", provider_message(&body)),
            });
        }

        resp.json().await.map_err(|e| Error::AuthProvider {
            message: format!("sign-in response: {e}"),
        })
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp> {
        let resp = self
            .http
            .post(self.url("signup"))
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::validation(provider_message(&body)));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Auth provider failed during sign-up");
            return Err(Error::AuthProvider {
                message: format!("sign-up failed ({status}): {}", provider_message(&body)),
            });
        }

        resp.json().await.map_err(|e| Error::AuthProvider {
            message: format!("sign-up response: {e}"),
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<User> {
        let resp = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match resp.status() {
            status if status.is_success() => resp.json().await.map_err(|e| Error::AuthProvider {
                message: format!("user response: {e}"),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized {
                message: "Invalid or expired token".to_string(),
            }),
            status => Err(Error::AuthProvider {
                message: format!("user lookup failed ({status})"),
            }),
        }
    }
}
