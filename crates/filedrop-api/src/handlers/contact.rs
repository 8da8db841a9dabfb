use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use filedrop_core::models::{ErrorResponse, InquiryRequest, InquiryResponse};
use filedrop_core::AppError;
use std::sync::Arc;
use validator::Validate;

/// Deliver a contact inquiry: form fields plus the attachment URLs produced
/// by the upload pipeline, forwarded to the notification service as email.
#[utoipa::path(
    post,
    path = "/api/v0/contact",
    tag = "contact",
    request_body = InquiryRequest,
    responses(
        (status = 200, description = "Inquiry delivered", body = InquiryResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Notification not configured or delivery failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "submit_inquiry"))]
pub async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<InquiryRequest>,
) -> Result<Json<InquiryResponse>, HttpAppError> {
    request.validate().map_err(HttpAppError::from)?;

    let email = state.email.as_ref().ok_or_else(|| {
        tracing::error!("Contact inquiry received but SMTP is not configured (SMTP_HOST/SMTP_FROM)");
        AppError::Config("SMTP notification service not configured".to_string())
    })?;

    let recipients = &state.config.contact_recipients;
    if recipients.is_empty() {
        tracing::error!("CONTACT_RECIPIENTS is not configured");
        return Err(AppError::Config("CONTACT_RECIPIENTS not configured".to_string()).into());
    }

    let subject = format!("New inquiry from {}", request.name);
    let body = render_inquiry(&request);

    email
        .send(recipients, &subject, &body)
        .await
        .map_err(AppError::Notification)?;

    tracing::info!(
        attachments = request.attachments.len(),
        "Contact inquiry delivered"
    );

    Ok(Json(InquiryResponse { success: true }))
}

/// Render the inquiry as the plain-text email body.
fn render_inquiry(request: &InquiryRequest) -> String {
    let mut body = format!(
        "Name: {}\nEmail: {}\nPhone: {}\nCompany: {}\n\n{}\n",
        request.name,
        request.email,
        request.phone.as_deref().unwrap_or("-"),
        request.company.as_deref().unwrap_or("-"),
        request.message,
    );

    if !request.attachments.is_empty() {
        body.push_str("\nAttachments:\n");
        for attachment in &request.attachments {
            body.push_str(&format!(
                "- {} ({} bytes): {}\n",
                attachment.file_name, attachment.file_size, attachment.url
            ));
        }
    }

    body
}
