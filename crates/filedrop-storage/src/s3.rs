use crate::traits::{ObjectInfo, ObjectMetadata, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use filedrop_core::StorageBackend;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    fn generate_url(&self, key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            key,
        )
    }

    /// Build the attribute set for a put: content type, a download disposition
    /// carrying the UTF-8 original name, and the custom metadata entries.
    fn build_attributes(content_type: &str, metadata: &ObjectMetadata) -> Attributes {
        let encoded_name = urlencoding::encode(&metadata.original_name).into_owned();
        let b64_name =
            base64::engine::general_purpose::STANDARD.encode(metadata.original_name.as_bytes());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes.insert(
            Attribute::ContentDisposition,
            format!("attachment; filename*=UTF-8''{}", encoded_name).into(),
        );
        attributes.insert(Attribute::Metadata("original-name".into()), b64_name.into());
        attributes.insert(
            Attribute::Metadata("original-name-utf8".into()),
            encoded_name.into(),
        );
        attributes.insert(
            Attribute::Metadata("upload-timestamp".into()),
            metadata.uploaded_at.to_rfc3339().into(),
        );
        attributes.insert(
            Attribute::Metadata("file-size".into()),
            metadata.byte_size.to_string().into(),
        );
        attributes
    }
}

/// Public URL for an S3 object.
///
/// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
/// For S3-compatible providers, uses path-style with the endpoint URL.
fn object_url(bucket: &str, region: &str, endpoint_url: Option<&str>, key: &str) -> String {
    if let Some(endpoint) = endpoint_url {
        let base_url = endpoint.trim_end_matches('/');
        format!("{}/{}/{}", base_url, bucket, key)
    } else {
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
    }
}

/// Map an `object_store` error onto a tagged `StorageError`.
///
/// S3 error codes (AccessDenied, NoSuchBucket, InvalidBucketName) reach us as
/// unstructured messages inside `Generic` errors, so this is the one place
/// that matches on message contents. Everything unrecognized stays a
/// `BackendError` with a generic user-facing message.
pub(crate) fn classify_backend_error(err: ObjectStoreError, key: &str) -> StorageError {
    if let ObjectStoreError::NotFound { .. } = err {
        return StorageError::NotFound(key.to_string());
    }

    let message = err.to_string();
    if message.contains("AccessDenied") || message.contains("Access Denied") {
        StorageError::AccessDenied
    } else if message.contains("NoSuchBucket") {
        StorageError::BucketNotFound
    } else if message.contains("InvalidBucketName") {
        StorageError::InvalidBucketName
    } else if message.contains("error sending request")
        || message.contains("timed out")
        || message.contains("dns error")
    {
        StorageError::NetworkFailure(message)
    } else {
        StorageError::BackendError(message)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let location = Path::from(key.to_string());
        let opts = PutOptions::from(Self::build_attributes(content_type, metadata));

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            match classify_backend_error(e, key) {
                StorageError::BackendError(msg) => StorageError::UploadFailed(msg),
                other => other,
            }
        })?;

        let url = self.generate_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn presigned_put_url(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::PUT, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| classify_backend_error(e, key))?
            .to_string();

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            expires_secs = expires_in.as_secs(),
            "Generated presigned PUT URL"
        );

        Ok(url)
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectInfo> {
        let location = Path::from(key.to_string());
        let meta = self
            .store
            .head(&location)
            .await
            .map_err(|e| classify_backend_error(e, key))?;

        Ok(ObjectInfo { size: meta.size })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(classify_backend_error(e, key)),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "S3 delete failed"
            );
            classify_backend_error(e, key)
        })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_error(message: &str) -> ObjectStoreError {
        ObjectStoreError::Generic {
            store: "S3",
            source: message.to_string().into(),
        }
    }

    #[test]
    fn classify_access_denied() {
        let err = classify_backend_error(generic_error("AccessDenied: not allowed"), "k");
        assert!(matches!(err, StorageError::AccessDenied));
    }

    #[test]
    fn classify_missing_bucket() {
        let err = classify_backend_error(
            generic_error("NoSuchBucket: the bucket does not exist"),
            "k",
        );
        assert!(matches!(err, StorageError::BucketNotFound));
    }

    #[test]
    fn classify_invalid_bucket_name() {
        let err = classify_backend_error(generic_error("InvalidBucketName: bad name"), "k");
        assert!(matches!(err, StorageError::InvalidBucketName));
    }

    #[test]
    fn classify_network_failure() {
        let err = classify_backend_error(
            generic_error("error sending request for url (https://bucket.s3...)"),
            "k",
        );
        assert!(matches!(err, StorageError::NetworkFailure(_)));
    }

    #[test]
    fn classify_unrecognized_is_backend_error() {
        let err = classify_backend_error(generic_error("SlowDown: reduce request rate"), "k");
        assert!(matches!(err, StorageError::BackendError(_)));
    }

    #[test]
    fn user_messages_are_specific_per_subtype() {
        assert!(StorageError::BucketNotFound.user_message().contains("bucket"));
        assert!(StorageError::AccessDenied.user_message().contains("denied"));
        // Unrecognized errors fall back to a generic message without internals.
        let generic = StorageError::BackendError("SlowDown: internal detail".to_string());
        assert!(!generic.user_message().contains("SlowDown"));
    }

    #[test]
    fn public_url_shapes() {
        assert_eq!(
            object_url("inquiries", "ap-northeast-2", None, "contact-files/a_b_c.pdf"),
            "https://inquiries.s3.ap-northeast-2.amazonaws.com/contact-files/a_b_c.pdf"
        );
        assert_eq!(
            object_url(
                "inquiries",
                "us-east-1",
                Some("http://localhost:9000/"),
                "contact-files/a_b_c.pdf"
            ),
            "http://localhost:9000/inquiries/contact-files/a_b_c.pdf"
        );
    }
}
