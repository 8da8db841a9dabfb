use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use filedrop_core::models::{ErrorResponse, FileMeta, PresignedUrlRequest, PresignedUrlResponse};
use filedrop_core::policy;
use filedrop_storage::generate_object_key;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// Phase A of the presigned flow: validate the declared file metadata and
/// issue a time-boxed PUT credential scoped to one object key and content
/// type.
///
/// Everything is checked before the credential is minted, so a rejected
/// request costs no data transfer. The declared content type is enforced
/// strictly here — it is signed into the credential, and a write with a
/// different `Content-Type` will be refused by storage.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/presigned",
    tag = "uploads",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "Presigned URL issued", body = PresignedUrlResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Configuration or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(file_name = %request.file_name, file_size = request.file_size, operation = "create_presigned_url")
)]
pub async fn create_presigned_url(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PresignedUrlRequest>,
) -> Result<Json<PresignedUrlResponse>, HttpAppError> {
    request.validate().map_err(HttpAppError::from)?;

    let meta = FileMeta::new(&request.file_name, request.file_size, &request.file_type);
    policy::validate(&meta)?;
    policy::validate_declared_mime(&request.file_type)?;

    let now = Utc::now();
    let (key, _safe_name) = generate_object_key(&request.file_name, now);

    let expires_in = state.config.presign_expiry_secs;
    let presigned_url = state
        .storage
        .presigned_put_url(&key, &request.file_type, Duration::from_secs(expires_in))
        .await?;
    let file_url = state.storage.public_url(&key);

    tracing::info!(
        file_name = %request.file_name,
        key = %key,
        expires_secs = expires_in,
        "Issued presigned upload URL"
    );

    Ok(Json(PresignedUrlResponse {
        success: true,
        presigned_url,
        file_url,
        key,
        expires_in,
    }))
}
