//! Database repository for check-ins.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::checkins::{CheckinCreateDBRequest, CheckinDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing check-ins
#[derive(Debug, Clone)]
pub struct CheckinFilter {
    pub limit: i64,
}

impl CheckinFilter {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }
}

pub struct Checkins<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Checkins<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Checkins<'_> {
    type CreateRequest = CheckinCreateDBRequest;
    type Response = CheckinDBResponse;
    type Id = Uuid;
    type Filter = CheckinFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let checkin = sqlx::query_as::<_, CheckinDBResponse>(
            r#"
            INSERT INTO checkins (id, message, phone)
            VALUES ($1, $2, $3)
            RETURNING id, message, phone, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.message)
        .bind(&request.phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(checkin)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let checkin = sqlx::query_as::<_, CheckinDBResponse>(
            "SELECT id, message, phone, created_at FROM checkins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(checkin)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let checkins = sqlx::query_as::<_, CheckinDBResponse>(
            "SELECT id, message, phone, created_at FROM checkins ORDER BY created_at DESC LIMIT $1",
        )
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(checkins)
    }
}
