use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::credentials::models::Credential;
use crate::credentials::models::LoginOutcome;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponseData>), ApiError> {
    // The rejection text may quote the payload, so only the status is kept.
    let Json(body) = body.map_err(|e| {
        ApiError::BadRequest(format!("Unreadable login payload ({})", e.status()))
    })?;

    let credential = Credential::new(body.username, body.password)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let outcome = state.credential_service.login(&credential).await?;

    Ok(match outcome {
        LoginOutcome::Authenticated(issued) => (
            StatusCode::OK,
            Json(LoginResponseData {
                authenticated: true,
                token: Some(issued.access_token),
            }),
        ),
        LoginOutcome::Rejected => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponseData {
                authenticated: false,
                token: None,
            }),
        ),
    })
}

/// Login payload. Holds a plaintext password, so it must not derive `Debug`.
#[derive(Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
