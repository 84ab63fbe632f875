use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::alerts::{AlertCreate, AlertResponse},
    auth::current_user::CurrentUser,
    db::handlers::{Alerts, Repository, alerts::AlertFilter},
    errors::{Error, Result},
};

/// How many alerts the public listing returns.
const RECENT_ALERTS: i64 = 50;

/// List the newest alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    responses(
        (status = 200, description = "Newest alerts, most recent first", body = Vec<AlertResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<AlertResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Alerts::new(&mut conn);

    let alerts = repo.list(&AlertFilter::new(RECENT_ALERTS)).await?;

    Ok(Json(alerts.into_iter().map(AlertResponse::from).collect()))
}

/// Publish an alert
#[utoipa::path(
    post,
    path = "/api/alerts",
    request_body = AlertCreate,
    tag = "alerts",
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Alert published", body = AlertResponse),
        (status = 400, description = "Missing title or message"),
        (status = 401, description = "Token required"),
        (status = 403, description = "Invalid token"),
    )
)]
#[tracing::instrument(skip_all, fields(subject = %current_user.subject))]
pub async fn create_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlertCreate>,
) -> Result<(StatusCode, Json<AlertResponse>)> {
    if request.title.trim().is_empty() || request.message.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Both 'title' and 'message' are required".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Alerts::new(&mut conn);

    let alert = repo.create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(AlertResponse::from(alert))))
}
