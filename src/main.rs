use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookden::config::Config;
use bookden::goodreads::GoodreadsClient;
use bookden::AppState;

#[derive(Parser, Debug)]
#[command(name = "bookden")]
#[command(author, version, about = "A book catalog and review site", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "BOOKDEN_CONFIG", default_value = "bookden.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bookden v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and run migrations
    let database_url = config.database.resolve_url()?;
    let db = bookden::db::connect(&database_url).await?;

    // Seed the starter catalog on first run
    bookden::db::seed_books(&db).await?;

    // Goodreads client for community ratings. A missing key is not fatal:
    // lookups fail and book pages render without the external block.
    let api_key = match config.goodreads.resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("{e}; community ratings will be unavailable");
            String::new()
        }
    };
    let goodreads = GoodreadsClient::new(api_key, config.goodreads.base_url.clone());

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), db, goodreads));

    // Combine routers - pages first, then the JSON API
    let app = axum::Router::new()
        .merge(bookden::ui::create_router().with_state(state.clone()))
        .merge(bookden::api::create_router(state))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
