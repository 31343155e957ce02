/*!
 * Media upload orchestration
 *
 * Composes the content validator, identifier generator, the active storage
 * backend, and the record store. Sequencing is the whole point here: a
 * record is only persisted after the physical save succeeded, and physical
 * deletion is attempted before record removal, so no record ever points at
 * content that does not exist.
 */

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::Database;
use crate::errors::MediaError;
use crate::ident;
use crate::models::MediaUpload;
use crate::storage::{MediaBackend, StorageError};
use crate::validation;

#[derive(Clone)]
pub struct MediaService {
    db: Database,
    backend: Arc<dyn MediaBackend>,
}

impl MediaService {
    pub fn new(db: Database, backend: Arc<dyn MediaBackend>) -> Self {
        Self { db, backend }
    }

    /// Validate, physically store, and record one uploaded file.
    ///
    /// `proposed_name` is the client's name for the upload and is used for
    /// diagnostics only; the stored name derives from the generated
    /// identifier and the sniffed type. Returns the persisted record; its
    /// `id` is the external handle.
    ///
    /// Failure at any step leaves no record behind. A crash between the
    /// physical save and record persistence leaves an orphaned artifact,
    /// never a record without content.
    pub async fn save_file(
        &self,
        content: &[u8],
        user_id: Uuid,
        proposed_name: &str,
        note_id: Option<Uuid>,
    ) -> Result<MediaUpload, MediaError> {
        let detected = validation::classify(content)?;
        debug!(
            "classified upload '{}' from user {} as {} ({} bytes)",
            proposed_name,
            user_id,
            detected.mime_type,
            content.len()
        );

        let user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or(MediaError::UserNotFound(user_id))?;

        if let Some(note_id) = note_id {
            self.db
                .get_note_by_id(note_id)
                .await?
                .ok_or(MediaError::NoteNotFound(note_id))?;
        }

        let id = ident::new_upload_id();
        let file_name = format!("{}.{}", id, detected.extension);

        let (locator, backend_data) = self.backend.save_file(content, &file_name).await?;

        let upload = MediaUpload {
            id,
            user_id: user.id,
            note_id,
            backend_type: self.backend.backend_type().to_string(),
            locator,
            backend_data,
            created_at: Utc::now(),
        };

        let record = match self.db.create_media_upload(&upload).await {
            Ok(record) => record,
            Err(e) => {
                // The artifact exists but the record never will; remove it
                // best-effort rather than waiting for an orphan sweep.
                warn!(
                    "record persistence failed after physical save of {}, removing artifact: {}",
                    upload.id, e
                );
                if let Err(cleanup) = self
                    .backend
                    .delete_file(&upload.locator, upload.backend_data.as_deref())
                    .await
                {
                    warn!(
                        "could not remove orphaned artifact {}: {}",
                        upload.locator, cleanup
                    );
                }
                return Err(MediaError::Internal(e));
            }
        };

        info!(
            "stored media upload {} for user '{}'",
            record.id, user.username
        );
        Ok(record)
    }

    /// Delete the physical artifact, then the record.
    ///
    /// Physical removal comes first so a crash mid-operation leaves at
    /// worst an orphaned artifact, never a dangling record. An artifact
    /// that is already absent is logged and does not block record cleanup;
    /// any other backend failure aborts with the record intact.
    pub async fn delete_file(&self, upload: &MediaUpload) -> Result<(), MediaError> {
        if upload.backend_type != self.backend.backend_type() {
            // Storage drift: the record was written by a backend that is no
            // longer active. The active backend cannot interpret the other
            // backend's data, so skip the physical call but still clean up
            // the record.
            warn!(
                "media upload {} was stored by backend '{}' but '{}' is active, skipping physical deletion",
                upload.id,
                upload.backend_type,
                self.backend.backend_type()
            );
        } else {
            match self
                .backend
                .delete_file(&upload.locator, upload.backend_data.as_deref())
                .await
            {
                Ok(()) => {}
                Err(StorageError::NotFound(_)) => {
                    warn!(
                        "artifact for media upload {} already absent, removing record anyway",
                        upload.id
                    );
                }
                Err(e) => return Err(MediaError::Backend(e)),
            }
        }

        let removed = self.db.delete_media_upload(&upload.id).await?;
        if !removed {
            debug!("media upload {} was already removed", upload.id);
        }

        info!("deleted media upload {}", upload.id);
        Ok(())
    }

    /// Look up a single upload by its external handle.
    pub async fn find_upload_by_id(&self, id: &str) -> Result<MediaUpload, MediaError> {
        self.db
            .get_media_upload_by_id(id)
            .await?
            .ok_or_else(|| MediaError::NotInStore(id.to_string()))
    }

    /// All uploads owned by a user. Never an absent result: no uploads is
    /// an empty vec.
    pub async fn list_uploads_by_user(&self, user_id: Uuid) -> Result<Vec<MediaUpload>, MediaError> {
        Ok(self.db.get_media_uploads_by_user(user_id).await?)
    }

    /// All uploads attached to a note, with the same empty-on-absent
    /// contract as [`Self::list_uploads_by_user`].
    pub async fn list_uploads_by_note(&self, note_id: Uuid) -> Result<Vec<MediaUpload>, MediaError> {
        Ok(self.db.get_media_uploads_by_note(note_id).await?)
    }

    /// Detach the upload from its note, keeping content and record for
    /// audit or later cleanup. Idempotent: detaching an already-orphaned
    /// upload returns the record unchanged. There is no reattachment
    /// operation; `note_id` never goes from null back to a note.
    pub async fn remove_note_from_media_upload(
        &self,
        upload: &MediaUpload,
    ) -> Result<MediaUpload, MediaError> {
        let updated = self
            .db
            .detach_note_from_media_upload(&upload.id)
            .await?
            .ok_or_else(|| MediaError::NotInStore(upload.id.clone()))?;

        if let Some(note_id) = upload.note_id {
            info!("detached media upload {} from note {}", upload.id, note_id);
        }

        Ok(updated)
    }
}
