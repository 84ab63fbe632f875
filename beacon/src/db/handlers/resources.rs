//! Database repository for relief/resource centers.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::resources::{ResourceCreateDBRequest, ResourceDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing resources.
///
/// `city` is a case-insensitive substring match; it must already have passed
/// external verification before it reaches the repository (see
/// [`crate::resolver`]).
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    pub city: Option<String>,
    pub limit: i64,
}

impl ResourceFilter {
    pub fn unfiltered(limit: i64) -> Self {
        Self { city: None, limit }
    }

    pub fn for_city(city: impl Into<String>, limit: i64) -> Self {
        Self {
            city: Some(city.into()),
            limit,
        }
    }
}

pub struct Resources<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Resources<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Resources<'_> {
    type CreateRequest = ResourceCreateDBRequest;
    type Response = ResourceDBResponse;
    type Id = Uuid;
    type Filter = ResourceFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let resource = sqlx::query_as::<_, ResourceDBResponse>(
            r#"
            INSERT INTO resources (id, name, category, city, address, contact)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, city, address, contact, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.category)
        .bind(&request.city)
        .bind(&request.address)
        .bind(&request.contact)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(resource)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let resource = sqlx::query_as::<_, ResourceDBResponse>(
            "SELECT id, name, category, city, address, contact, created_at FROM resources WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(resource)
    }

    #[instrument(skip(self, filter), fields(city = ?filter.city, limit = filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let resources = match &filter.city {
            Some(city) => {
                sqlx::query_as::<_, ResourceDBResponse>(
                    r#"
                    SELECT id, name, category, city, address, contact, created_at
                    FROM resources
                    WHERE city ILIKE $1
                    ORDER BY name
                    LIMIT $2
                    "#,
                )
                .bind(format!("%{city}%"))
                .bind(filter.limit)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, ResourceDBResponse>(
                    "SELECT id, name, category, city, address, contact, created_at FROM resources ORDER BY name LIMIT $1",
                )
                .bind(filter.limit)
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        Ok(resources)
    }
}
