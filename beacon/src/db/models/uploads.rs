//! Database models for upload metadata rows.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for recording an accepted upload.
///
/// Only metadata is stored here; file content is either encoded into the
/// owning record or discarded after the request, never staged on disk.
#[derive(Debug, Clone)]
pub struct UploadCreateDBRequest {
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
}

/// Database response for an upload metadata row
#[derive(Debug, Clone, FromRow)]
pub struct UploadDBResponse {
    pub id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}
