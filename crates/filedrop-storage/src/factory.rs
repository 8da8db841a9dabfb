#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use filedrop_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration.
///
/// Missing variables are logged by name server-side; the resulting
/// `ConfigError` carries them too, and the API layer makes sure only a
/// generic message reaches clients.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend.unwrap_or(StorageBackend::S3);

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config.s3_bucket.clone().ok_or_else(|| {
                tracing::error!("S3_BUCKET is not configured");
                StorageError::ConfigError("S3_BUCKET not configured".to_string())
            })?;
            let region = config
                .s3_region_or_aws()
                .map(String::from)
                .ok_or_else(|| {
                    tracing::error!("Neither S3_REGION nor AWS_REGION is configured");
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint.clone();

            let storage = S3Storage::new(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                tracing::error!("LOCAL_STORAGE_PATH is not configured");
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                tracing::error!("LOCAL_STORAGE_BASE_URL is not configured");
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
