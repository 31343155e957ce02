use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{storage::StorageConfig, swagger::ApiDoc, AppState};

pub mod health;
pub mod media;

/// Assemble the full application router. Shared between `main` and the
/// integration tests so both exercise the same routing table.
pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/media", media::router())
        .route("/api/notes/{note_id}/media", get(media::list_media_by_note))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Uploaded content is served statically for the filesystem backend;
    // other backends would bring their own delivery path.
    match state.config.storage_config() {
        StorageConfig::Filesystem { upload_path } => {
            router = router.nest_service(
                "/uploads",
                ServeDir::new(Path::new(&upload_path).join("media")),
            );
        }
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}
