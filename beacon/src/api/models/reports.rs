//! API models for incident reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::reports::ReportDBResponse;

/// A submitted incident report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub description: String,
    pub location: String,
    /// Inline data URI or upload reference, depending on deployment configuration
    pub media: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReportDBResponse> for ReportResponse {
    fn from(db: ReportDBResponse) -> Self {
        Self {
            id: db.id,
            description: db.description,
            location: db.location,
            media: db.media,
            created_at: db.created_at,
        }
    }
}
