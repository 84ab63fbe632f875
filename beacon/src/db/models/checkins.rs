//! Database models for check-ins.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a new check-in record
#[derive(Debug, Clone)]
pub struct CheckinCreateDBRequest {
    pub message: String,
    pub phone: String,
}

/// Database response for a check-in record. Immutable once created.
#[derive(Debug, Clone, FromRow)]
pub struct CheckinDBResponse {
    pub id: Uuid,
    pub message: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}
