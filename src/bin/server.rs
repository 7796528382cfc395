use std::error::Error;
use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use brainstash::ingest::ContentIngestor;
use brainstash::server::config::ServerConfig;
use brainstash::snapshot::{HttpBlobStore, RemoteRenderer, SnapshotService};
use brainstash::web::create_axum_router;

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info` level if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let config = match ServerConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!(error = %e, "Critical error loading configuration. Exiting.");
            return Err(e.into());
        }
    };

    let mut connect_options = ConnectOptions::new(config.database_url.clone());
    connect_options.max_connections(10).sqlx_logging(false);
    let db = match Database::connect(connect_options).await {
        Ok(db) => {
            info!("Database connected successfully.");
            db
        }
        Err(e) => {
            error!(error = %e, "Database connection error. Exiting.");
            return Err(e.into());
        }
    };

    let snapshots = config.snapshot.as_ref().map(|snap| {
        SnapshotService::new(
            Box::new(RemoteRenderer::new(
                snap.screenshot_api_url.clone(),
                snap.screenshot_api_key.clone(),
            )),
            Box::new(HttpBlobStore::new(
                snap.blob_endpoint.clone(),
                snap.blob_public_base_url.clone(),
                snap.blob_api_token.clone(),
            )),
        )
    });
    if snapshots.is_none() {
        info!("Snapshot pipeline not configured; thumbnails disabled.");
    }

    let ingestor = Arc::new(ContentIngestor::new(
        snapshots,
        config.extended_provider_rules,
    ));
    let app = create_axum_router(db, ingestor, config.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "brainstash server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
