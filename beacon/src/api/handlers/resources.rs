use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    api::models::resources::{ResourceResponse, ResourcesQuery},
    errors::Result,
    resolver,
};

/// List relief/resource centers, optionally filtered by verified city
#[utoipa::path(
    get,
    path = "/api/resources",
    tag = "resources",
    params(ResourcesQuery),
    responses(
        (status = 200, description = "Matching resource centers", body = Vec<ResourceResponse>),
        (status = 404, description = "Unknown location"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(city = ?query.city))]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourcesQuery>,
) -> Result<Json<Vec<ResourceResponse>>> {
    // An empty filter is no filter
    let city = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let resources = resolver::resolve(&state.geocode, &state.db, city).await?;

    Ok(Json(resources.into_iter().map(ResourceResponse::from).collect()))
}
