use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Metadata of a candidate file, as seen by the validation policy.
///
/// The name may contain non-ASCII characters; the MIME type may be empty or
/// unreliable (browsers report it inconsistently for office formats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
        }
    }
}

/// Successful response from the server-proxied upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    /// Publicly accessible URL of the stored object
    pub url: String,
    /// Original (unsanitized) filename
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// Object key in storage
    pub key: String,
}

/// Request to issue a presigned PUT credential (Phase A of the presigned flow).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Declared content type; signed into the credential
    #[validate(length(min = 1, max = 255, message = "File type must not be empty"))]
    pub file_type: String,
    /// Declared size in bytes
    pub file_size: u64,
}

/// Response carrying a presigned PUT credential.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlResponse {
    pub success: bool,
    /// Time-boxed URL to PUT the raw file bytes to
    pub presigned_url: String,
    /// URL the object will be reachable at after the write
    pub file_url: String,
    /// Object key the credential is scoped to
    pub key: String,
    /// Credential validity window in seconds
    pub expires_in: u64,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

/// A successfully uploaded attachment, as referenced in a contact inquiry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Contact inquiry: form fields plus the attachment URLs produced by the
/// upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

/// Response after a contact inquiry has been delivered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn upload_response_uses_camel_case_wire_names() {
        let response = UploadResponse {
            success: true,
            url: "https://bucket.s3.ap-northeast-2.amazonaws.com/contact-files/x_y_plan.docx"
                .to_string(),
            file_name: "plan.docx".to_string(),
            file_size: 1_000_000,
            key: "contact-files/x_y_plan.docx".to_string(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("fileName").is_some());
        assert!(json.get("fileSize").is_some());
        assert!(json.get("file_name").is_none());
    }

    #[test]
    fn presigned_request_rejects_empty_file_type() {
        let request = PresignedUrlRequest {
            file_name: "plan.docx".to_string(),
            file_type: String::new(),
            file_size: 1024,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn error_response_shape() {
        let body = ErrorResponse::new("File size exceeds the 5 MB limit", "INVALID_INPUT");
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json.get("success").and_then(|v| v.as_bool()), Some(false));
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
    }

    #[test]
    fn inquiry_requires_valid_email() {
        let inquiry = InquiryRequest {
            name: "Kim".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            company: None,
            message: "Hello".to_string(),
            attachments: vec![],
        };
        assert!(inquiry.validate().is_err());
    }
}
