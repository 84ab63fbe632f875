//! Database repository for upload metadata rows.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::uploads::{UploadCreateDBRequest, UploadDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing uploads
#[derive(Debug, Clone)]
pub struct UploadFilter {
    pub limit: i64,
}

impl UploadFilter {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }
}

pub struct Uploads<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Uploads<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Uploads<'_> {
    type CreateRequest = UploadCreateDBRequest;
    type Response = UploadDBResponse;
    type Id = Uuid;
    type Filter = UploadFilter;

    #[instrument(skip(self, request), fields(name = %request.original_name, size = request.size_bytes), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let upload = sqlx::query_as::<_, UploadDBResponse>(
            r#"
            INSERT INTO uploads (id, original_name, size_bytes, mime_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_name, size_bytes, mime_type, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.original_name)
        .bind(request.size_bytes)
        .bind(&request.mime_type)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(upload)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let upload = sqlx::query_as::<_, UploadDBResponse>(
            "SELECT id, original_name, size_bytes, mime_type, created_at FROM uploads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(upload)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let uploads = sqlx::query_as::<_, UploadDBResponse>(
            "SELECT id, original_name, size_bytes, mime_type, created_at FROM uploads ORDER BY created_at DESC LIMIT $1",
        )
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(uploads)
    }
}
