use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::uploads::UploadResponse,
    db::handlers::{Repository, Uploads},
    db::models::uploads::UploadCreateDBRequest,
    errors::{Error, Result},
    uploads::UploadPolicy,
};

/// Accept a file and record its metadata
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(
        content_type = "multipart/form-data",
        description = "A single `file` field (image or PDF, bounded size)"
    ),
    responses(
        (status = 201, description = "File accepted, metadata recorded", body = UploadResponse),
        (status = 400, description = "Missing file field"),
        (status = 413, description = "File too large"),
        (status = 415, description = "Unsupported file type"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(String, String, u64)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        // The content is held in memory only long enough to measure it; this
        // route records metadata, never the bytes
        let content = field.bytes().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read file: {e}"),
        })?;

        file = Some((file_name, mime_type, content.len() as u64));
    }

    let (file_name, mime_type, size_bytes) = file.ok_or_else(|| Error::BadRequest {
        message: "Missing required field: 'file'".to_string(),
    })?;

    // Validate before anything touches the store
    let policy = UploadPolicy::new(&state.config.uploads);
    policy.validate(&mime_type, size_bytes)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Uploads::new(&mut conn);

    let upload = repo
        .create(&UploadCreateDBRequest {
            original_name: file_name,
            size_bytes: size_bytes as i64,
            mime_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(upload))))
}
