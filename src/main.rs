use std::sync::Arc;

use anyhow::Context;
use jurnal_api::config::Config;
use jurnal_api::store::{postgres, EntryStore, MemoryStore, PgEntryStore};
use jurnal_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jurnal_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn EntryStore> = match &config.database_url {
        Some(url) => {
            let db = postgres::create_pool(url, config.database_max_connections)
                .await
                .context("failed to create database pool")?;
            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            Arc::new(PgEntryStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, entries are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    if config.admin_api_token.is_none() {
        tracing::warn!("ADMIN_API_TOKEN not set, admin routes will refuse every request");
    }

    let addr = config.listen_addr();
    let app = router(AppState::new(store, config));

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
