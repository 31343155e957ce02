use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable record for one stored media upload.
///
/// `id` is the opaque external handle, assigned at creation and never
/// reused, not the original filename. `backend_data` is an opaque blob
/// owned by the backend named in `backend_type`; the service passes it
/// around but never interprets it. `note_id` is nullable: `None` marks an
/// orphaned upload whose note was deleted or which was explicitly detached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUpload {
    pub id: String,
    pub user_id: Uuid,
    pub note_id: Option<Uuid>,
    pub backend_type: String,
    /// Public stored name chosen by the backend, used to build retrieval
    /// URLs. Distinct from `backend_data`, which may hold private paths.
    pub locator: String,
    pub backend_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// API-facing view of a media upload
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MediaUploadResponse {
    pub id: String,
    pub url: String,
    pub user_id: Uuid,
    pub note_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaUpload> for MediaUploadResponse {
    fn from(upload: MediaUpload) -> Self {
        MediaUploadResponse {
            url: format!("/uploads/{}", upload.locator),
            id: upload.id,
            user_id: upload.user_id,
            note_id: upload.note_id,
            created_at: upload.created_at,
        }
    }
}
