use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::User;

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    /// Resolve a user by id. The media subsystem treats users as an
    /// external collaborator: read-only lookups, no lifecycle management.
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        self.with_retry(|| async {
            let row = sqlx::query(
                r#"SELECT id, username, display_name, created_at
                   FROM users WHERE id = $1"#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database query failed: {}", e))?;

            Ok(row.as_ref().map(user_from_row))
        })
        .await
    }

    pub async fn create_user(&self, username: &str, display_name: Option<&str>) -> Result<User> {
        self.with_retry(|| async {
            let row = sqlx::query(
                r#"INSERT INTO users (username, display_name)
                   VALUES ($1, $2)
                   RETURNING id, username, display_name, created_at"#,
            )
            .bind(username)
            .bind(display_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            Ok(user_from_row(&row))
        })
        .await
    }
}
