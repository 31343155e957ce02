use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notewell::{
    config::Config,
    db::Database,
    routes,
    services::media_service::MediaService,
    storage::factory::create_media_backend,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notewell=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = Database::new(&config.database_url).await?;
    db.migrate().await?;
    info!("database ready");

    let backend = create_media_backend(config.storage_config()).await?;
    info!("media backend '{}' initialized", backend.backend_type());

    let media_service = MediaService::new(db.clone(), backend);

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        media_service,
    });

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    info!("notewell listening on {}", config.server_address);
    axum::serve(listener, app).await?;

    Ok(())
}
