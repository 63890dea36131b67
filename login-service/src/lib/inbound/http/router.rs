use std::sync::Arc;
use std::time::Duration;

use auth::TokenGuard;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use thiserror::Error;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::secure_data::secure_data;
use super::middleware::require_identity;
use crate::credentials::ports::CredentialServicePort;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Rejected `cors.allowed_origins` entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorsConfigError {
    #[error("Wildcard origin cannot be combined with credentialed requests")]
    WildcardOrigin,

    #[error("Origin {0:?} is not a valid header value")]
    InvalidOrigin(String),
}

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub token_guard: Arc<TokenGuard>,
}

pub fn create_router(
    credential_service: Arc<dyn CredentialServicePort>,
    token_guard: Arc<TokenGuard>,
    cors_layer: CorsLayer,
) -> Router {
    let state = AppState {
        credential_service,
        token_guard,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/db_route", post(login))
        .route("/healthz", get(health));

    let protected_routes = Router::new()
        .route("/api/secure-data", get(secure_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    // Headers are never recorded: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                request_id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer)
        .with_state(state)
}

/// CORS policy for browser clients on `allowed_origins`.
///
/// An empty list allows no cross-origin caller.
///
/// # Errors
/// * `WildcardOrigin` - An entry is `*`
/// * `InvalidOrigin` - An origin is not a valid header value
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, CorsConfigError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            if origin.trim() == "*" {
                return Err(CorsConfigError::WildcardOrigin);
            }
            HeaderValue::from_str(origin)
                .map_err(|_| CorsConfigError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_origins() {
        let origins = vec!["https://command.dulc3.tech".to_string()];
        assert!(cors_layer(&origins).is_ok());
        assert!(cors_layer(&[]).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let origins = vec!["https://bad\norigin".to_string()];
        assert!(matches!(
            cors_layer(&origins),
            Err(CorsConfigError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_cors_layer_rejects_wildcard_origin() {
        let origins = vec!["https://command.dulc3.tech".to_string(), "*".to_string()];
        assert!(matches!(
            cors_layer(&origins),
            Err(CorsConfigError::WildcardOrigin)
        ));
    }
}
