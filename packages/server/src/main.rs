use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemBlobStore;
use tracing::info;

use grievance_server::config::AppConfig;
use grievance_server::state::AppState;
use grievance_server::store::StorePolicy;
use grievance_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let policy = StorePolicy::from_config(&config);
    seed::seed_officers(&db, &policy, &config.seed.officers)
        .await
        .context("Failed to seed officers")?;

    let photos = FilesystemBlobStore::new(
        config.storage.photo_dir.clone(),
        config.storage.max_photo_size,
    )
    .await
    .context("Failed to open photo store")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config: Arc::new(config),
        policy,
        photos: Arc::new(photos),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
