//! API models for check-ins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::checkins::{CheckinCreateDBRequest, CheckinDBResponse};
use crate::sms::NotificationStatus;

/// Request body for submitting a check-in
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckinCreate {
    pub message: String,
    pub phone: String,
}

impl From<CheckinCreate> for CheckinCreateDBRequest {
    fn from(api: CheckinCreate) -> Self {
        Self {
            message: api.message,
            phone: api.phone,
        }
    }
}

/// A persisted check-in, plus the outcome of the notification step.
///
/// The record is durable regardless of `notification`; a `failed` outcome is
/// partial success, not an error.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckinResponse {
    pub id: Uuid,
    pub message: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub notification: NotificationStatus,
}

impl CheckinResponse {
    pub fn new(db: CheckinDBResponse, notification: NotificationStatus) -> Self {
        Self {
            id: db.id,
            message: db.message,
            phone: db.phone,
            created_at: db.created_at,
            notification,
        }
    }
}
