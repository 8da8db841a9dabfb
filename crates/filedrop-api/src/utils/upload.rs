//! Common utilities for the upload handlers.

use axum::extract::Multipart;
use filedrop_core::AppError;

/// A file extracted from a multipart form.
pub struct MultipartFile {
    pub data: Vec<u8>,
    pub file_name: String,
    /// Browser-supplied MIME type; empty when the client sent none.
    pub content_type: String,
}

/// Extract file data, filename, and content type from a multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<MultipartFile, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            file_name = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data.to_vec());
        }
    }

    let data = file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    Ok(MultipartFile {
        data,
        file_name: file_name.unwrap_or_else(|| "unknown".to_string()),
        content_type: content_type.unwrap_or_default(),
    })
}
