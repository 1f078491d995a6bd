//! API error types and problem-details responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::PaginationError;
use crate::registry::StoreError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidPage(#[from] PaginationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{detail}")]
    Conflict { detail: String, instance: String },

    #[error("{0}")]
    Internal(String),
}

/// RFC 7807 problem details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidPage(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Received an invalid issuer configuration.",
            ApiError::InvalidPage(_) => "Received an invalid page request.",
            ApiError::NotFound(_) => "Not found.",
            ApiError::Conflict { .. } => "Conflict.",
            ApiError::Internal(_) => "Internal error.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let instance = match &self {
            ApiError::Conflict { instance, .. } => Some(instance.clone()),
            _ => None,
        };
        let body = ProblemDetails {
            title: self.title().to_string(),
            status: status.as_u16(),
            detail: self.to_string(),
            instance,
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(did) => ApiError::Conflict {
                detail: "Issuer already exists.".to_string(),
                instance: did,
            },
            StoreError::NotFound(did) => ApiError::NotFound(format!("Issuer {did} not found.")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
