// Main entry point for the template server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use storage_client::{StorageClient, StorageOptions};
use template_core::domains::auth::JwtService;
use template_core::kernel::{PgPublicationLookup, ServerDeps, StorageAdapter};
use template_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,template_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting template server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(preview_domain = %config.preview_domain, "Configuration loaded");

    // Connect to database (publication flags only; schema is owned elsewhere)
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Object storage
    let storage_options = StorageOptions::new(
        config.storage_url.clone(),
        config.storage_service_key.clone(),
        config.storage_bucket.clone(),
    )
    .with_timeout(Duration::from_secs(config.storage_timeout_secs));
    let storage =
        StorageClient::new(storage_options).context("Failed to create storage client")?;
    tracing::info!(bucket = storage.bucket(), "Object storage client ready");

    let deps = ServerDeps::new(
        Arc::new(StorageAdapter::new(Arc::new(storage))),
        Arc::new(PgPublicationLookup::new(pool)),
        config.preview_domain.clone(),
        config.upload_concurrency,
    )
    .with_max_extracted_bytes(config.max_extracted_bytes);
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());

    // Build application
    let app = build_app(
        deps,
        jwt_service,
        &config.allowed_origins,
        config.max_upload_bytes,
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
