//! Database repository for incident reports.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::reports::{ReportCreateDBRequest, ReportDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing reports
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub limit: i64,
}

impl ReportFilter {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }
}

pub struct Reports<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reports<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Reports<'_> {
    type CreateRequest = ReportCreateDBRequest;
    type Response = ReportDBResponse;
    type Id = Uuid;
    type Filter = ReportFilter;

    #[instrument(skip(self, request), fields(has_media = request.media.is_some()), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let report = sqlx::query_as::<_, ReportDBResponse>(
            r#"
            INSERT INTO reports (id, description, location, media)
            VALUES ($1, $2, $3, $4)
            RETURNING id, description, location, media, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.description)
        .bind(&request.location)
        .bind(&request.media)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let report = sqlx::query_as::<_, ReportDBResponse>(
            "SELECT id, description, location, media, created_at FROM reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let reports = sqlx::query_as::<_, ReportDBResponse>(
            "SELECT id, description, location, media, created_at FROM reports ORDER BY created_at DESC LIMIT $1",
        )
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(reports)
    }
}
