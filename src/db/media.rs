use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::MediaUpload;

const MEDIA_UPLOAD_COLUMNS: &str =
    "id, user_id, note_id, backend_type, locator, backend_data, created_at";

fn media_upload_from_row(row: &sqlx::postgres::PgRow) -> MediaUpload {
    MediaUpload {
        id: row.get("id"),
        user_id: row.get("user_id"),
        note_id: row.get("note_id"),
        backend_type: row.get("backend_type"),
        locator: row.get("locator"),
        backend_data: row.get("backend_data"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    pub async fn create_media_upload(&self, upload: &MediaUpload) -> Result<MediaUpload> {
        self.with_retry(|| async {
            let row = sqlx::query(&format!(
                r#"INSERT INTO media_uploads (id, user_id, note_id, backend_type, locator, backend_data, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)
                   RETURNING {}"#,
                MEDIA_UPLOAD_COLUMNS
            ))
            .bind(&upload.id)
            .bind(upload.user_id)
            .bind(upload.note_id)
            .bind(&upload.backend_type)
            .bind(&upload.locator)
            .bind(&upload.backend_data)
            .bind(upload.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create media upload: {}", e))?;

            Ok(media_upload_from_row(&row))
        })
        .await
    }

    pub async fn get_media_upload_by_id(&self, id: &str) -> Result<Option<MediaUpload>> {
        self.with_retry(|| async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM media_uploads WHERE id = $1",
                MEDIA_UPLOAD_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

            Ok(row.as_ref().map(media_upload_from_row))
        })
        .await
    }

    /// All uploads owned by `user_id`, oldest first. `fetch_all` yields an
    /// empty vec for no rows, so callers never see an absent result.
    pub async fn get_media_uploads_by_user(&self, user_id: Uuid) -> Result<Vec<MediaUpload>> {
        self.with_retry(|| async {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM media_uploads WHERE user_id = $1 ORDER BY created_at",
                MEDIA_UPLOAD_COLUMNS
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

            Ok(rows.iter().map(media_upload_from_row).collect())
        })
        .await
    }

    pub async fn get_media_uploads_by_note(&self, note_id: Uuid) -> Result<Vec<MediaUpload>> {
        self.with_retry(|| async {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM media_uploads WHERE note_id = $1 ORDER BY created_at",
                MEDIA_UPLOAD_COLUMNS
            ))
            .bind(note_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

            Ok(rows.iter().map(media_upload_from_row).collect())
        })
        .await
    }

    /// Null out the note reference, leaving content and record in place.
    /// Setting an already-null reference to null is a no-op, which is what
    /// makes detachment idempotent at the service layer.
    pub async fn detach_note_from_media_upload(&self, id: &str) -> Result<Option<MediaUpload>> {
        self.with_retry(|| async {
            let row = sqlx::query(&format!(
                "UPDATE media_uploads SET note_id = NULL WHERE id = $1 RETURNING {}",
                MEDIA_UPLOAD_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to detach note from media upload: {}", e))?;

            Ok(row.as_ref().map(media_upload_from_row))
        })
        .await
    }

    /// Remove the record. Returns whether a row was actually deleted so the
    /// caller can tell a clean delete from a concurrent one.
    pub async fn delete_media_upload(&self, id: &str) -> Result<bool> {
        self.with_retry(|| async {
            let result = sqlx::query("DELETE FROM media_uploads WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete media upload: {}", e))?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
