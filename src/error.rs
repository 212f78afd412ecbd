use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::jwt::TokenError;
use crate::db::StoreError;

/// Failure outcomes of every operation exposed over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("wrong password")]
    InvalidCredential,
    #[error("access denied, token not found")]
    Unauthenticated,
    #[error("invalid or expired token")]
    Forbidden,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredential | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(constraint) => {
                tracing::warn!(%constraint, "unique constraint rejected write");
                if constraint.starts_with("users_") {
                    AppError::Conflict("username or email is already taken".into())
                } else {
                    AppError::Conflict("record already exists".into())
                }
            }
            StoreError::Backend(e) => AppError::Internal(anyhow::Error::new(e).context("storage")),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Forbidden
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
}

/// JSON envelope shared by every response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
            error: None,
        })
    }
}

impl Envelope<()> {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: Status::Success,
            message: message.into(),
            data: None,
            error: None,
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Internal(e) => {
                error!(error = %format!("{:#}", e), "request failed");
                Envelope::<()> {
                    status: Status::Error,
                    message: "unexpected server error".into(),
                    data: None,
                    error: Some(format!("{:#}", e)),
                }
            }
            other => Envelope::<()> {
                status: Status::Fail,
                message: other.to_string(),
                data: None,
                error: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
