use std::sync::Arc;

use recetario_common::storage::filesystem::FilesystemImageStore;
use tracing::{Level, info};

use recetario_server::config::AppConfig;
use recetario_server::database::init_db;
use recetario_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let level = config
        .server
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let db = init_db(&config.database.url).await?;
    let images = FilesystemImageStore::new(
        config.storage.image_dir.clone(),
        config.storage.max_image_size,
    )
    .await?;
    info!("Serving images from {}", images.base_path().display());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db, Arc::new(images));
    let app = recetario_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
