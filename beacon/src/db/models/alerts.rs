//! Database models for alerts.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a new alert
#[derive(Debug, Clone)]
pub struct AlertCreateDBRequest {
    pub title: String,
    pub message: String,
}

/// Database response for an alert
#[derive(Debug, Clone, FromRow)]
pub struct AlertDBResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
