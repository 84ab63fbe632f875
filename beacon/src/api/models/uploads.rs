//! API models for upload metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::uploads::UploadDBResponse;

/// Metadata for an accepted upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<UploadDBResponse> for UploadResponse {
    fn from(db: UploadDBResponse) -> Self {
        Self {
            id: db.id,
            original_name: db.original_name,
            size_bytes: db.size_bytes,
            mime_type: db.mime_type,
            created_at: db.created_at,
        }
    }
}
