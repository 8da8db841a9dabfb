use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{extract::Multipart, extract::State, Json};
use bytes::Bytes;
use chrono::Utc;
use filedrop_core::models::{ErrorResponse, FileMeta, UploadResponse};
use filedrop_core::policy;
use filedrop_storage::{generate_object_key, ObjectMetadata};
use std::sync::Arc;

/// Server-proxied upload: accept the raw file as multipart and write it to
/// object storage on the client's behalf.
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Configuration or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let file = extract_multipart_file(multipart).await.map_err(HttpAppError::from)?;

    let meta = FileMeta::new(&file.file_name, file.data.len() as u64, &file.content_type);

    // Server-side re-validation: the client is untrusted even if it already
    // ran the same policy.
    policy::validate(&meta)?;

    let now = Utc::now();
    let (key, safe_name) = generate_object_key(&meta.name, now);

    // Empty browser-supplied MIME becomes a generic binary type on the
    // stored object; the policy has already accepted the file on extension.
    let content_type = if meta.mime_type.is_empty() {
        "application/octet-stream"
    } else {
        meta.mime_type.as_str()
    };

    let metadata = ObjectMetadata {
        original_name: meta.name.clone(),
        uploaded_at: now,
        byte_size: meta.byte_size,
    };

    let url = state
        .storage
        .put(&key, Bytes::from(file.data), content_type, &metadata)
        .await?;

    tracing::info!(
        file_name = %meta.name,
        safe_name = %safe_name,
        key = %key,
        size_bytes = meta.byte_size,
        "File uploaded via server-proxied path"
    );

    Ok(Json(UploadResponse {
        success: true,
        url,
        file_name: meta.name,
        file_size: meta.byte_size,
        key,
    }))
}
