//! OpenAPI documentation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedrop API",
        description = "Contact-attachment upload service: server-proxied uploads, presigned direct uploads, and inquiry delivery"
    ),
    paths(
        crate::handlers::upload::upload_file,
        crate::handlers::presigned::create_presigned_url,
        crate::handlers::contact::submit_inquiry,
    ),
    components(schemas(
        filedrop_core::models::UploadResponse,
        filedrop_core::models::PresignedUrlRequest,
        filedrop_core::models::PresignedUrlResponse,
        filedrop_core::models::InquiryRequest,
        filedrop_core::models::InquiryResponse,
        filedrop_core::models::AttachmentRef,
        filedrop_core::models::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Attachment upload endpoints"),
        (name = "contact", description = "Contact inquiry delivery")
    )
)]
pub struct ApiDoc;
