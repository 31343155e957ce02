use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::Note;

fn note_from_row(row: &sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    /// Resolve a note by id. Like users, notes belong to the document
    /// layer; media only needs the reference to attach uploads to.
    pub async fn get_note_by_id(&self, note_id: Uuid) -> Result<Option<Note>> {
        self.with_retry(|| async {
            let row = sqlx::query(
                r#"SELECT id, owner_id, title, created_at
                   FROM notes WHERE id = $1"#,
            )
            .bind(note_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

            Ok(row.as_ref().map(note_from_row))
        })
        .await
    }

    pub async fn create_note(&self, owner_id: Option<Uuid>, title: Option<&str>) -> Result<Note> {
        self.with_retry(|| async {
            let row = sqlx::query(
                r#"INSERT INTO notes (owner_id, title)
                   VALUES ($1, $2)
                   RETURNING id, owner_id, title, created_at"#,
            )
            .bind(owner_id)
            .bind(title)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create note: {}", e))?;

            Ok(note_from_row(&row))
        })
        .await
    }
}
