use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use bytes::Bytes;

use crate::{
    AppState,
    api::models::reports::ReportResponse,
    auth::current_user::CurrentUser,
    db::handlers::{Reports, Repository, Uploads},
    db::models::{reports::ReportCreateDBRequest, uploads::UploadCreateDBRequest},
    errors::{Error, Result},
    uploads::{UploadPolicy, to_data_uri},
};

/// Submit an incident report with optional media
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    security(("bearer_token" = [])),
    request_body(
        content_type = "multipart/form-data",
        description = "Fields `description` and `location`, plus an optional `media` file (image or PDF, bounded size)"
    ),
    responses(
        (status = 201, description = "Report created", body = ReportResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Token required"),
        (status = 403, description = "Invalid token"),
        (status = 413, description = "Media too large"),
        (status = 415, description = "Unsupported media type"),
    )
)]
#[tracing::instrument(skip_all, fields(subject = %current_user.subject))]
pub async fn create_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    let mut description: Option<String> = None;
    let mut location: Option<String> = None;
    let mut media: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        match field.name().unwrap_or("") {
            "description" => {
                description = Some(field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read description: {e}"),
                })?);
            }
            "location" => {
                location = Some(field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read location: {e}"),
                })?);
            }
            "media" => {
                let file_name = field.file_name().unwrap_or("media").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read media: {e}"),
                })?;
                media = Some((file_name, mime_type, content));
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    let description = description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| Error::BadRequest {
            message: "Missing required field: 'description'".to_string(),
        })?;
    let location = location
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| Error::BadRequest {
            message: "Missing required field: 'location'".to_string(),
        })?;

    // Validate before anything touches the store
    let media_field = match media {
        None => None,
        Some((file_name, mime_type, content)) => {
            let policy = UploadPolicy::new(&state.config.uploads);
            policy.validate(&mime_type, content.len() as u64)?;

            if state.config.uploads.inline_media {
                Some(to_data_uri(&mime_type, &content))
            } else {
                let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
                let mut uploads = Uploads::new(&mut conn);
                let stored = uploads
                    .create(&UploadCreateDBRequest {
                        original_name: file_name,
                        size_bytes: content.len() as i64,
                        mime_type,
                    })
                    .await?;
                Some(format!("upload:{}", stored.id))
            }
        }
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Reports::new(&mut conn);

    let report = repo
        .create(&ReportCreateDBRequest {
            description,
            location,
            media: media_field,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}
