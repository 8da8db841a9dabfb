//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
///
/// Backend failures are classified into tagged variants instead of leaving
/// callers to match on message substrings. Classification from unstructured
/// backend messages happens in exactly one place (`s3::classify_backend_error`).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Access to storage denied")]
    AccessDenied,

    #[error("Invalid bucket name")]
    InvalidBucketName,

    #[error("Could not reach object storage: {0}")]
    NetworkFailure(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// User-facing message for this error. Specific per subtype, generic for
    /// unrecognized backend failures; never leaks backend internals.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::BucketNotFound => "The storage bucket could not be found".to_string(),
            StorageError::AccessDenied => "Access to storage was denied".to_string(),
            StorageError::InvalidBucketName => "The storage bucket name is invalid".to_string(),
            StorageError::NetworkFailure(_) => "Could not reach the storage service".to_string(),
            StorageError::NotFound(key) => format!("File not found: {}", key),
            StorageError::InvalidKey(_) => "Invalid storage key".to_string(),
            StorageError::ConfigError(_) => {
                "Server configuration error. Please contact the administrator.".to_string()
            }
            StorageError::UploadFailed(_)
            | StorageError::BackendError(_)
            | StorageError::IoError(_) => {
                "An error occurred while uploading the file".to_string()
            }
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata stored alongside an attachment.
///
/// The original name is encoded by the backend (base64 and percent-encoding)
/// so non-ASCII filenames survive header transport.
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub byte_size: u64,
}

/// Stored object info returned by `head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub size: u64,
}

/// Storage abstraction trait
///
/// Backends (S3, local filesystem) implement this so the upload handlers can
/// work against any of them without coupling to implementation details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write an object with its full metadata set in one atomic put and
    /// return the public URL.
    ///
    /// Either the object exists with all of its metadata afterwards, or the
    /// call failed and nothing is considered uploaded.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<String>;

    /// Generate a presigned PUT URL scoped to exactly `key` and
    /// `content_type`, valid for `expires_in`.
    ///
    /// Only supported by S3 backends; other backends return a `ConfigError`.
    async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Look up a stored object's metadata.
    async fn head(&self, key: &str) -> StorageResult<ObjectInfo>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object by key
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Publicly accessible URL for a key
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> filedrop_core::StorageBackend;
}
