/// SSO Service Main Entry Point
///
/// Starts the gRPC Auth service with:
/// - PostgreSQL connection pool and embedded migrations
/// - gRPC health reporting
/// - HTTP side server for /health and /metrics
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sso_service::{
    config::Settings,
    db::PgCredentialStore,
    grpc::{sso::auth::v1::auth_server::AuthServer, AuthGrpcService, RequestInterceptor},
    http, metrics,
    security::Argon2Hasher,
    AuthService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use token_core::TokenManager;
use tokio::signal;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sso_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting SSO Service");

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    metrics::initialize_auth_metrics();

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let auth = AuthService::new(
        Arc::new(PgCredentialStore::new(db_pool)),
        Arc::new(Argon2Hasher::new()),
        TokenManager::new(settings.tokens.secrets().clone()),
        settings.tokens.ttls(),
    );

    let grpc_addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    let http_addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.metrics_port)
            .parse()
            .context("Invalid metrics server address")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let http_task = tokio::spawn(http::serve(http_addr, wait_for_shutdown(shutdown_rx.clone())));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServer<AuthGrpcService>>()
        .await;

    if settings.internal_grpc_api_key.is_some() {
        info!("Internal API key required on gRPC calls");
    }
    let interceptor = RequestInterceptor::new(settings.internal_grpc_api_key.clone());

    info!("Starting gRPC server on {}", grpc_addr);

    Server::builder()
        .add_service(health_service)
        .add_service(AuthServer::with_interceptor(
            AuthGrpcService::new(auth),
            interceptor,
        ))
        .serve_with_shutdown(grpc_addr, wait_for_shutdown(shutdown_rx))
        .await
        .context("gRPC server error")?;

    match http_task.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("HTTP server error: {}", err),
        Err(err) => error!("HTTP server task failed: {}", err),
    }

    info!("SSO service shutdown complete");

    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
