use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::checkins::{CheckinCreate, CheckinResponse},
    auth::current_user::CurrentUser,
    db::handlers::{Checkins, Repository},
    errors::{Error, Result},
    sms,
};

/// Submit a check-in, optionally triggering an SMS notification
#[utoipa::path(
    post,
    path = "/api/checkins",
    request_body = CheckinCreate,
    tag = "checkins",
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Check-in recorded; `notification` reports the dispatch outcome", body = CheckinResponse),
        (status = 400, description = "Missing message or phone"),
        (status = 401, description = "Token required"),
        (status = 403, description = "Invalid token"),
    )
)]
#[tracing::instrument(skip_all, fields(subject = %current_user.subject))]
pub async fn create_checkin(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CheckinCreate>,
) -> Result<(StatusCode, Json<CheckinResponse>)> {
    if request.message.trim().is_empty() || request.phone.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Both 'message' and 'phone' are required".to_string(),
        });
    }

    // Durability before notification: the record is committed first, and a
    // failed dispatch never rolls it back
    let record = {
        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let mut repo = Checkins::new(&mut conn);
        repo.create(&request.into()).await?
    };

    let notification = sms::notify_checkin(&state.sms, &record).await;

    Ok((StatusCode::CREATED, Json(CheckinResponse::new(record, notification))))
}
