use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credentials::errors::CredentialError;

pub mod health;
pub mod login;
pub mod secure_data;

/// Externally visible failure categories.
///
/// Bodies carry only a fixed, generic message. Internal detail is logged
/// when the response is built and never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::InternalServerError(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::BadRequest(detail) => {
                tracing::debug!(error = %detail, "Rejected invalid request");
                error_response(StatusCode::BAD_REQUEST, "Invalid request")
            }
            ApiError::Unauthorized(reason) => {
                tracing::warn!(reason = %reason, "Rejected unauthorized request");
                let mut response = error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    header::HeaderValue::from_static("Bearer"),
                );
                response
            }
        }
    }
}

fn error_response(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ApiErrorData { error: message })).into_response()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub error: &'static str,
}
