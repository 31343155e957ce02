use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collaborative document ("note") identity.
///
/// Revisions, permissions, and editing live in the document layer; media
/// only holds note ids to attach uploads to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}
