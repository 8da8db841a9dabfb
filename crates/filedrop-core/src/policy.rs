//! Attachment validation policy
//!
//! The single size/type policy shared by the upload client, the server-proxied
//! upload endpoint, and the presigned-URL endpoint. Validation is pure and
//! deterministic; the only side effect is a warning log on the advisory MIME
//! check.
//!
//! Rule precedence: empty file, then size, then extension. The MIME type is
//! advisory only — browsers and desktop environments report it inconsistently
//! for office formats and non-Western filenames, so a valid extension wins
//! over an unknown or empty MIME type. The one place a MIME type is enforced
//! is [`validate_declared_mime`], used when issuing a presigned credential:
//! the declared type is baked into the credential, so an unknown type is
//! rejected up front instead of producing a signed URL that storage will
//! refuse.

use crate::models::FileMeta;
use std::path::Path;

/// Maximum accepted attachment size: 5 MiB.
pub const MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Allowed file extensions (lowercase, without the leading dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "hwp", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "pdf", "jpg", "jpeg", "png", "zip",
];

/// Why a candidate file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("Empty files cannot be uploaded")]
    EmptyFile,

    #[error("File size exceeds the 5 MB limit")]
    TooLarge,

    #[error("File type is not allowed. Allowed types: .hwp .doc .docx .xls .xlsx .ppt .pptx .pdf .jpg .jpeg .png .zip")]
    BadExtension,

    #[error("Content type is not allowed")]
    BadMimeType,
}

/// Lowercased extension of a filename, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Known-good MIME types for an allowed extension.
///
/// Used for the advisory check only; an empty slice means the extension is not
/// in the allow-set.
fn known_mime_types(extension: &str) -> &'static [&'static str] {
    match extension {
        "hwp" => &["application/vnd.hancom.hwp"],
        "doc" => &["application/msword"],
        "docx" => &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        "ppt" => &["application/vnd.ms-powerpoint"],
        "pptx" => &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
        "pdf" => &["application/pdf"],
        "jpg" | "jpeg" => &["image/jpeg", "image/jpg"],
        "png" => &["image/png"],
        "zip" => &["application/zip", "application/x-zip-compressed"],
        _ => &[],
    }
}

/// Normalize a MIME type: strip parameters ("; charset=...") and lowercase.
fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .trim()
        .to_lowercase()
}

/// Whether `mime_type` is a known-good type for `extension`.
pub fn is_known_mime_for(extension: &str, mime_type: &str) -> bool {
    let normalized = normalize_mime(mime_type);
    known_mime_types(extension).iter().any(|m| *m == normalized)
}

/// Validate a candidate file against the attachment policy.
///
/// First failing rule determines the rejection reason. A valid extension with
/// an empty or unexpected MIME type is accepted with a warning.
pub fn validate(meta: &FileMeta) -> Result<(), RejectionReason> {
    if meta.byte_size == 0 {
        return Err(RejectionReason::EmptyFile);
    }

    if meta.byte_size > MAX_SIZE_BYTES {
        return Err(RejectionReason::TooLarge);
    }

    let extension = extension_of(&meta.name).ok_or(RejectionReason::BadExtension)?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(RejectionReason::BadExtension);
    }

    if !is_known_mime_for(&extension, &meta.mime_type) {
        tracing::warn!(
            file_name = %meta.name,
            mime_type = %meta.mime_type,
            extension = %extension,
            "MIME type does not match extension; accepting on extension"
        );
    }

    Ok(())
}

/// Strict MIME check for presigned-credential issuance.
///
/// The declared content type is signed into the credential, so it must be one
/// of the known-good types for some allowed extension.
pub fn validate_declared_mime(mime_type: &str) -> Result<(), RejectionReason> {
    let normalized = normalize_mime(mime_type);
    if normalized.is_empty() {
        return Err(RejectionReason::BadMimeType);
    }

    let known = ALLOWED_EXTENSIONS
        .iter()
        .flat_map(|ext| known_mime_types(ext).iter())
        .any(|m| *m == normalized);

    if known {
        Ok(())
    } else {
        Err(RejectionReason::BadMimeType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, size: u64, mime: &str) -> FileMeta {
        FileMeta::new(name, size, mime)
    }

    #[test]
    fn empty_file_rejected_regardless_of_extension_and_mime() {
        assert_eq!(
            validate(&meta("report.pdf", 0, "application/pdf")),
            Err(RejectionReason::EmptyFile)
        );
        assert_eq!(
            validate(&meta("archive.exe", 0, "")),
            Err(RejectionReason::EmptyFile)
        );
    }

    #[test]
    fn oversized_file_rejected_even_with_valid_extension_and_mime() {
        assert_eq!(
            validate(&meta("report.pdf", MAX_SIZE_BYTES + 1, "application/pdf")),
            Err(RejectionReason::TooLarge)
        );
    }

    #[test]
    fn size_exactly_at_limit_accepted() {
        assert!(validate(&meta("report.pdf", MAX_SIZE_BYTES, "application/pdf")).is_ok());
    }

    #[test]
    fn uppercase_extension_with_empty_mime_accepted() {
        assert!(validate(&meta("report.PDF", 1024, "")).is_ok());
    }

    #[test]
    fn disallowed_extension_rejected_regardless_of_mime() {
        assert_eq!(
            validate(&meta("archive.exe", 1024, "application/pdf")),
            Err(RejectionReason::BadExtension)
        );
    }

    #[test]
    fn missing_extension_rejected() {
        assert_eq!(
            validate(&meta("README", 1024, "text/plain")),
            Err(RejectionReason::BadExtension)
        );
    }

    #[test]
    fn korean_filename_accepted() {
        assert!(validate(&meta("사업계획서.hwp", 2048, "")).is_ok());
    }

    #[test]
    fn validation_is_idempotent() {
        let file = meta("plan.docx", 1_000_000, "");
        assert_eq!(validate(&file), validate(&file));

        let bad = meta("virus.exe", 1_000_000, "");
        assert_eq!(validate(&bad), validate(&bad));
    }

    #[test]
    fn mime_with_parameters_recognized() {
        assert!(is_known_mime_for("pdf", "application/pdf; charset=binary"));
        assert!(is_known_mime_for("jpg", "IMAGE/JPEG"));
        assert!(!is_known_mime_for("pdf", "image/png"));
    }

    #[test]
    fn declared_mime_strict_check() {
        assert!(validate_declared_mime("application/pdf").is_ok());
        assert!(validate_declared_mime("application/zip").is_ok());
        assert_eq!(
            validate_declared_mime(""),
            Err(RejectionReason::BadMimeType)
        );
        assert_eq!(
            validate_declared_mime("application/octet-stream"),
            Err(RejectionReason::BadMimeType)
        );
    }
}
