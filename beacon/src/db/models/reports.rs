//! Database models for incident reports.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a new report.
///
/// `media` carries either an inline data URI or an upload-row reference,
/// depending on the deployment's encoding choice. None when no file was sent.
#[derive(Debug, Clone)]
pub struct ReportCreateDBRequest {
    pub description: String,
    pub location: String,
    pub media: Option<String>,
}

/// Database response for a report
#[derive(Debug, Clone, FromRow)]
pub struct ReportDBResponse {
    pub id: Uuid,
    pub description: String,
    pub location: String,
    pub media: Option<String>,
    pub created_at: DateTime<Utc>,
}
