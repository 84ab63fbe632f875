//! API models for the resource directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::models::resources::ResourceDBResponse;

/// Query parameters for the directory listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResourcesQuery {
    /// City filter; verified against the external geocoder before use
    pub city: Option<String>,
}

/// A relief/resource center
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl From<ResourceDBResponse> for ResourceResponse {
    fn from(db: ResourceDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            category: db.category,
            city: db.city,
            address: db.address,
            contact: db.contact,
            created_at: db.created_at,
        }
    }
}
