use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use donation_api::config::{config, AppConfig};
use donation_api::database::{MemoryStore, PgStore, Store};
use donation_api::{app, AppState};

#[derive(Parser)]
#[command(name = "donation-api")]
#[command(about = "Donation API - organizations post requirements, donors fulfill them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Keep all data in process memory instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("donation_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Donation API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { in_memory: false }) {
        Commands::Serve { in_memory } => serve(config, in_memory).await,
        Commands::Migrate => {
            let store = PgStore::connect(&config.database).await?;
            store.migrate().await?;
            store.close().await;
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, in_memory: bool) -> anyhow::Result<()> {
    let mut pg = None;
    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("using in-memory storage; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let store = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        if config.database.run_migrations {
            store.migrate().await?;
        }
        pg = Some(store.clone());
        Arc::new(store)
    };

    let router = app(AppState::new(store, config.clone()));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Donation API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(store) = pg {
        store.close().await;
    }
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
