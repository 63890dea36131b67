use auth::Identity;
use axum::Extension;
use axum::Json;
use serde::Serialize;

/// Example protected resource: echoes the identity the guard attached.
pub async fn secure_data(Extension(identity): Extension<Identity>) -> Json<SecureDataResponse> {
    Json(SecureDataResponse {
        message: "You are authorized".to_string(),
        username: identity.subject,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecureDataResponse {
    pub message: String,
    pub username: String,
}
