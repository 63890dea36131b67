use std::sync::Arc;

use auth::Authenticator;
use login_service::config::Config;
use login_service::domain::credentials::service::CredentialService;
use login_service::inbound::http::router::cors_layer;
use login_service::inbound::http::router::create_router;
use login_service::outbound::repositories::PostgresCredentialRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "login_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "login-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        key_version = %config.jwt.key_version,
        retired_key_versions = config.jwt.retired_keys.len(),
        allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    // A missing signing secret must stop the process here, not on the first login.
    let signing_keys = config.jwt.signing_keys().map_err(|e| {
        tracing::error!(error = %e, "Signing key configuration is invalid");
        e
    })?;
    let authenticator = Arc::new(Authenticator::new(
        &signing_keys,
        config.jwt.token_lifetime()?,
    )?);
    let token_guard = Arc::new(authenticator.token_guard());

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .idle_timeout(config.database.idle_timeout())
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        min_connections = config.database.min_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let credential_repository = Arc::new(PostgresCredentialRepository::new(pg_pool));
    let credential_service = Arc::new(CredentialService::new(
        credential_repository,
        authenticator,
        config.database.lookup_timeout(),
    ));

    let http_application = create_router(
        credential_service,
        token_guard,
        cors_layer(&config.cors.allowed_origins)?,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
