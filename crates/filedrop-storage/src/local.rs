use crate::traits::{ObjectInfo, ObjectMetadata, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use filedrop_core::StorageBackend;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Development and test backend. Custom object metadata is not persisted; the
/// filesystem's own metadata (size) backs `head`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.split('/').any(|segment| segment == "..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid path segments".to_string(),
            ));
        }

        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
        _metadata: &ObjectMetadata,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let size = data.len() as u64;
        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            "Local upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn presigned_put_url(
        &self,
        _key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::ConfigError(
            "Presigned uploads require the S3 storage backend".to_string(),
        ))
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectInfo> {
        let path = self.key_to_path(key)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
                _ => StorageError::BackendError(e.to_string()),
            })?;
        Ok(ObjectInfo { size: meta.len() })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::BackendError(e.to_string()),
        })?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_object_key;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn test_storage() -> (LocalStorage, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
            .await
            .expect("storage");
        (storage, dir)
    }

    fn test_metadata(name: &str, size: u64) -> ObjectMetadata {
        ObjectMetadata {
            original_name: name.to_string(),
            uploaded_at: Utc::now(),
            byte_size: size,
        }
    }

    #[tokio::test]
    async fn put_then_head_returns_original_size() {
        let (storage, _dir) = test_storage().await;
        let data = Bytes::from(vec![0u8; 1024]);
        let (key, safe_name) = generate_object_key("my plan.docx", Utc::now());

        let url = storage
            .put(&key, data, "application/octet-stream", &test_metadata("my plan.docx", 1024))
            .await
            .expect("put");

        assert!(url.starts_with("http://localhost:3000/files/contact-files/"));
        assert!(key.contains(&safe_name));

        let info = storage.head(&key).await.expect("head");
        assert_eq!(info.size, 1024);
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let (storage, _dir) = test_storage().await;
        let (key, _) = generate_object_key("note.pdf", Utc::now());

        assert!(!storage.exists(&key).await.expect("exists"));

        storage
            .put(
                &key,
                Bytes::from_static(b"pdf bytes"),
                "application/pdf",
                &test_metadata("note.pdf", 9),
            )
            .await
            .expect("put");
        assert!(storage.exists(&key).await.expect("exists"));

        storage.delete(&key).await.expect("delete");
        assert!(!storage.exists(&key).await.expect("exists"));
    }

    #[tokio::test]
    async fn head_of_missing_object_is_not_found() {
        let (storage, _dir) = test_storage().await;
        let err = storage.head("contact-files/missing.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let (storage, _dir) = test_storage().await;
        let err = storage.head("../outside.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn presigned_put_unsupported() {
        let (storage, _dir) = test_storage().await;
        let err = storage
            .presigned_put_url("contact-files/a.pdf", "application/pdf", Duration::from_secs(300))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }
}
