use axum::{Json, extract::State};

use crate::{AppState, api::models::news::NewsItem, errors::Result};

/// Relay the top entries of the government news feed
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses(
        (status = 200, description = "Top feed entries", body = Vec<NewsItem>),
        (status = 500, description = "Feed unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>> {
    let items = state.news.top_items().await?;
    Ok(Json(items))
}
