use std::convert::Infallible;
use std::sync::Arc;

use archive::BackendError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub const DEMO_USER_ID: &str = "mock-user-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Resolves a session token to an identity. `Ok(None)` means no
/// authenticated user; transport failures are errors.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn identify(&self, token: Option<&str>) -> Result<Option<Identity>, BackendError>;
}

/// Demo mode: everyone is the demo account, token or not.
pub struct MockAuth;

#[async_trait]
impl AuthProvider for MockAuth {
    async fn identify(&self, _token: Option<&str>) -> Result<Option<Identity>, BackendError> {
        Ok(Some(Identity {
            id: DEMO_USER_ID.to_string(),
            email: Some("demo@shibaura-it.ac.jp".to_string()),
            display_name: Some("芝浦 太郎".to_string()),
        }))
    }
}

/// Live mode: validate the bearer token against the backend's auth
/// endpoint. An invalid or expired token is "nobody", not an error.
pub struct RemoteAuth {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl RemoteAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

#[async_trait]
impl AuthProvider for RemoteAuth {
    async fn identify(&self, token: Option<&str>) -> Result<Option<Identity>, BackendError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!(
                "{}/auth/v1/user",
                self.base_url.trim_end_matches('/')
            ))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let user: AuthUser = response.json().await?;
        Ok(Some(Identity {
            id: user.id,
            email: user.email,
            display_name: None,
        }))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// Raw session token, if the request carried one. Never rejects.
pub struct Session(pub Option<String>);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        Ok(Session(bearer_token(parts)))
    }
}

async fn identity(parts: &Parts, state: &Arc<AppState>) -> Result<Option<Identity>, AppError> {
    Ok(state
        .auth
        .identify(bearer_token(parts).as_deref())
        .await?)
}

/// Identity gate for page handlers; absence redirects to the login
/// surface.
pub struct CurrentUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, AppError> {
        identity(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Identity gate for JSON api handlers; absence answers 401.
pub struct ApiUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, AppError> {
        identity(parts, state)
            .await?
            .map(ApiUser)
            .ok_or(AppError::AuthRequired)
    }
}
