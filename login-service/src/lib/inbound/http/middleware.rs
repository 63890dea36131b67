use auth::GuardError;
use auth::Identity;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates the bearer token and attaches the caller's
/// [`Identity`] to the request extensions.
///
/// Every rejection yields the same 401; only the log line carries the reason.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity =
        authorize(&state, &req).map_err(|e| ApiError::Unauthorized(e.reason().to_string()))?;

    tracing::debug!("Request credential accepted");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn authorize(state: &AppState, req: &Request) -> Result<Identity, GuardError> {
    let authorization = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            GuardError::MalformedCredential("non-ASCII authorization header".to_string())
        })?),
        None => None,
    };

    state.token_guard.validate(authorization)
}
