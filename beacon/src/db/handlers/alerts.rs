//! Database repository for alerts.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::alerts::{AlertCreateDBRequest, AlertDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing alerts
#[derive(Debug, Clone)]
pub struct AlertFilter {
    pub limit: i64,
}

impl AlertFilter {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }
}

pub struct Alerts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Alerts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Alerts<'_> {
    type CreateRequest = AlertCreateDBRequest;
    type Response = AlertDBResponse;
    type Id = Uuid;
    type Filter = AlertFilter;

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let alert = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            INSERT INTO alerts (id, title, message)
            VALUES ($1, $2, $3)
            RETURNING id, title, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.title)
        .bind(&request.message)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(alert)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let alert = sqlx::query_as::<_, AlertDBResponse>(
            "SELECT id, title, message, created_at FROM alerts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(alert)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let alerts = sqlx::query_as::<_, AlertDBResponse>(
            "SELECT id, title, message, created_at FROM alerts ORDER BY created_at DESC LIMIT $1",
        )
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(alerts)
    }
}
