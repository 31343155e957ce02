//! Error taxonomy for the media subsystem
//!
//! Client-facing failures (validation, missing references, unknown uploads)
//! are distinct from backend/infrastructure failures so callers and the HTTP
//! layer can map them without string matching.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Content sniffing could not determine any MIME type at all.
    #[error("could not determine a media type from the uploaded content")]
    UnidentifiableContent,

    /// A recognized type that is not on the allow-list.
    #[error("media type '{0}' is not allowed")]
    UnsupportedMediaType(String),

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("note {0} not found")]
    NoteNotFound(Uuid),

    /// The requested media upload record does not exist.
    #[error("media upload '{0}' not found")]
    NotInStore(String),

    /// Physical save/delete failed for a reason other than "already absent".
    #[error("storage backend failure: {0}")]
    Backend(#[from] StorageError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MediaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MediaError::UnidentifiableContent => StatusCode::UNPROCESSABLE_ENTITY,
            MediaError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            MediaError::UserNotFound(_) | MediaError::NoteNotFound(_) | MediaError::NotInStore(_) => {
                StatusCode::NOT_FOUND
            }
            MediaError::Backend(_) | MediaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("media request failed: {}", self);
        } else {
            tracing::debug!("media request rejected: {}", self);
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string()
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_client_status_codes() {
        assert_eq!(
            MediaError::UnidentifiableContent.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            MediaError::UnsupportedMediaType("application/zip".to_string()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            MediaError::NotInStore("missing".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MediaError::UserNotFound(Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn backend_failures_are_server_errors() {
        let err = MediaError::Backend(StorageError::InvalidName("..".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = MediaError::Internal(anyhow::anyhow!("record store unavailable"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
