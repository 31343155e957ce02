//! HTTP glue for the media service
//!
//! Thin handlers only: authorization checks that need the record's owner
//! happen here, everything else is delegated to [`MediaService`].

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    errors::MediaError,
    models::MediaUploadResponse,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(upload_media).get(list_own_media))
        .route("/{id}", get(get_media).delete(delete_media))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Note to attach the upload to; omitted uploads start out orphaned.
    pub note_id: Option<Uuid>,
    /// Client's name for the file. A hint for diagnostics only; it never
    /// influences where or under what name content is stored.
    pub filename: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/media",
    tag = "media",
    request_body(content = Vec<u8>, description = "Raw file bytes"),
    params(
        ("note_id" = Option<Uuid>, Query, description = "Note to attach the upload to"),
        ("filename" = Option<String>, Query, description = "Original filename hint"),
    ),
    responses(
        (status = 201, description = "Upload stored", body = MediaUploadResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Referenced note does not exist"),
        (status = 415, description = "Recognized but unsupported media type"),
        (status = 422, description = "Content type could not be determined"),
    )
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Response, MediaError> {
    let proposed_name = query.filename.as_deref().unwrap_or("upload");

    let upload = state
        .media_service
        .save_file(&body, auth_user.user.id, proposed_name, query.note_id)
        .await?;

    Ok((StatusCode::CREATED, Json(MediaUploadResponse::from(upload))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = String, Path, description = "Upload identifier")),
    responses(
        (status = 200, description = "Upload metadata", body = MediaUploadResponse),
        (status = 404, description = "No such upload"),
    )
)]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MediaUploadResponse>, MediaError> {
    let upload = state.media_service.find_upload_by_id(&id).await?;
    Ok(Json(MediaUploadResponse::from(upload)))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = String, Path, description = "Upload identifier")),
    responses(
        (status = 204, description = "Upload deleted"),
        (status = 403, description = "Caller does not own the upload"),
        (status = 404, description = "No such upload"),
    )
)]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, MediaError> {
    let upload = state.media_service.find_upload_by_id(&id).await?;

    // Ownership check lives at this boundary: the service exposes the
    // owner, the transport decides who may act.
    if upload.user_id != auth_user.user.id {
        tracing::warn!(
            "user '{}' attempted to delete media upload {} owned by another user",
            auth_user.user.username,
            upload.id
        );
        return Ok((
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "error": "only the uploader may delete a media upload"
            })),
        )
            .into_response());
    }

    state.media_service.delete_file(&upload).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    responses(
        (status = 200, description = "All uploads owned by the caller", body = [MediaUploadResponse]),
    )
)]
pub async fn list_own_media(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> Result<Json<Vec<MediaUploadResponse>>, MediaError> {
    let uploads = state
        .media_service
        .list_uploads_by_user(auth_user.user.id)
        .await?;

    Ok(Json(uploads.into_iter().map(MediaUploadResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/notes/{note_id}/media",
    tag = "media",
    params(("note_id" = Uuid, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "All uploads attached to the note", body = [MediaUploadResponse]),
    )
)]
pub async fn list_media_by_note(
    State(state): State<Arc<AppState>>,
    _auth_user: AuthUser,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Vec<MediaUploadResponse>>, MediaError> {
    let uploads = state.media_service.list_uploads_by_note(note_id).await?;
    Ok(Json(uploads.into_iter().map(MediaUploadResponse::from).collect()))
}
