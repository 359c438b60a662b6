use archive::BackendError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. Every variant resolves to either
/// a redirect or a visible error body; nothing is swallowed.
#[derive(Error, Debug)]
pub enum AppError {
    /// No identity on a page that needs one; send the user to log in.
    #[error("authentication required")]
    Unauthorized,

    /// No identity on a JSON api call; answer 401 instead of redirecting.
    #[error("認証が必要です")]
    AuthRequired,

    /// Cascade page reached without its parent query parameter.
    #[error("required parent selection is missing")]
    MissingParent,

    /// The requested entity does not exist; land on the nearest valid
    /// ancestor screen instead of a broken detail view.
    #[error("entity not found")]
    NotFound { redirect: &'static str },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("backend error: {0}")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => Self::Unauthorized,
            other => Self::Backend(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => Redirect::to("/auth/login").into_response(),
            AppError::MissingParent => Redirect::to("/study/faculties").into_response(),
            AppError::NotFound { redirect } => Redirect::to(redirect).into_response(),
            AppError::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
            AppError::Backend(err) => {
                error!("backend error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "サーバーエラーが発生しました" })),
                )
                    .into_response()
            }
        }
    }
}
