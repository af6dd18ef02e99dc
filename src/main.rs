use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use posts_api::auth::TokenCodec;
use posts_api::config;
use posts_api::database::{migrations, DatabaseManager, MemoryStorage, PgStorage, Storage};
use posts_api::AppState;

#[derive(Parser)]
#[command(name = "posts-api")]
#[command(about = "Users and posts JSON API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to listen on")]
    port: Option<u16>,

    #[arg(long, help = "Keep all data in process memory instead of PostgreSQL")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("posts_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let config = config::config();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting posts-api in {:?} mode", config.environment);

    let tokens = TokenCodec::from_config(&config.security).context("invalid token configuration")?;

    let mut manager = None;
    let storage: Arc<dyn Storage> = if args.in_memory {
        tracing::warn!("Using in-memory storage; data is lost on exit");
        Arc::new(MemoryStorage::new())
    } else {
        let url = config.database_url()?;
        let db = DatabaseManager::connect(url, &config.database)
            .await
            .context("failed to connect to database")?;
        migrations::run(db.pool())
            .await
            .context("failed to run migrations")?;
        manager = Some(db.clone());
        Arc::new(PgStorage::new(db))
    };

    let app = posts_api::app(AppState::new(storage, tokens), config);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("posts-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = manager {
        manager.close().await;
    }

    tracing::info!("posts-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
