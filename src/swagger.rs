use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::media::upload_media,
        crate::routes::media::get_media,
        crate::routes::media::delete_media,
        crate::routes::media::list_own_media,
        crate::routes::media::list_media_by_note,
    ),
    components(schemas(crate::models::MediaUploadResponse)),
    tags(
        (name = "health", description = "Service health"),
        (name = "media", description = "Media upload management")
    ),
    info(
        title = "Notewell API",
        description = "Media persistence layer of the Notewell document collaboration platform"
    )
)]
pub struct ApiDoc;
