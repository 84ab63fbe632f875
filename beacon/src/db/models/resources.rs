//! Database models for relief/resource centers.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database request for creating a new resource center entry
#[derive(Debug, Clone)]
pub struct ResourceCreateDBRequest {
    pub name: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub contact: String,
}

/// Database response for a resource center
#[derive(Debug, Clone, FromRow)]
pub struct ResourceDBResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}
