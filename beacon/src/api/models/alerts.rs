//! API models for alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::alerts::{AlertCreateDBRequest, AlertDBResponse};

/// Request body for publishing an alert
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AlertCreate {
    pub title: String,
    pub message: String,
}

impl From<AlertCreate> for AlertCreateDBRequest {
    fn from(api: AlertCreate) -> Self {
        Self {
            title: api.title,
            message: api.message,
        }
    }
}

/// A published alert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<AlertDBResponse> for AlertResponse {
    fn from(db: AlertDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            message: db.message,
            created_at: db.created_at,
        }
    }
}
