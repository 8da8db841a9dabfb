//! Upload transports.
//!
//! One `FileTransport` interface with two implementations selected by the
//! caller: `ServerProxiedTransport` sends the raw file through the
//! intermediary service, which validates and writes to storage itself;
//! `PresignedTransport` first obtains a short-lived single-object write
//! credential from the service, then writes directly to object storage.
//!
//! Both re-run the attachment policy locally before any network traffic, and
//! both report byte-level progress on the leg that actually carries the data.

use crate::body::progress_body;
use crate::progress::ProgressFn;
use crate::UploadClient;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use filedrop_core::models::{
    ErrorResponse, FileMeta, PresignedUrlRequest, PresignedUrlResponse, UploadResponse,
};
use filedrop_core::policy::{self, RejectionReason};
use reqwest::multipart;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

/// A file selected for upload: metadata plus the whole blob.
///
/// Immutable once selected; the pipeline only borrows it for the duration of
/// an upload attempt.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub meta: FileMeta,
    pub bytes: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        let name = name.into();
        let byte_size = bytes.len() as u64;
        Self {
            meta: FileMeta::new(name, byte_size, mime_type),
            bytes,
        }
    }
}

/// A successfully stored attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAttachment {
    pub url: String,
    pub key: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Errors produced by the transports.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file failed the local policy check; no network call was made.
    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    /// The upload service could not be reached at all.
    #[error("Could not reach the upload service: {0}")]
    Network(String),

    /// The upload service answered with an error response.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Object storage refused the direct write (presigned flow, Phase B).
    #[error("Storage rejected the upload: {status} {status_text}")]
    StorageRejected { status: u16, status_text: String },

    /// The credential expired before the direct write began.
    #[error("Upload credential expired before the write began")]
    CredentialExpired,

    /// The direct write was aborted through the cancellation hook.
    #[error("Upload was cancelled")]
    Cancelled,

    /// The request could not be constructed (e.g. malformed MIME type).
    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    /// The service answered 2xx but the body was not the expected shape.
    #[error("Invalid response from upload service: {0}")]
    InvalidResponse(String),
}

/// A single-use presigned write credential.
///
/// Consumed by value on use: a fresh descriptor must be acquired for every
/// retry, and one descriptor can never be shared across files.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub put_url: String,
    pub public_url: String,
    pub object_key: String,
    pub expires_at: DateTime<Utc>,
}

impl UploadTarget {
    pub fn from_response(response: PresignedUrlResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            put_url: response.presigned_url,
            public_url: response.file_url,
            object_key: response.key,
            expires_at: issued_at + Duration::seconds(response.expires_in as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// One interface over both upload strategies.
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Upload one file, reporting byte-level percent progress if a callback
    /// is supplied.
    async fn upload(
        &self,
        file: &CandidateFile,
        progress: Option<ProgressFn>,
    ) -> Result<UploadedAttachment, UploadError>;

    /// Whether this transport acquires a write credential before the data
    /// transfer (drives the `GeneratingUrl` state in trackers).
    fn acquires_credentials(&self) -> bool {
        false
    }
}

fn map_send_error(err: reqwest::Error) -> UploadError {
    UploadError::Network(err.to_string())
}

/// Turn a non-2xx service response into a `Service` error, preserving the
/// server's message when the body parses as the documented error shape.
async fn service_rejection(status: StatusCode, response: reqwest::Response) -> UploadError {
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {}", status),
    };
    UploadError::Service {
        status: status.as_u16(),
        message,
    }
}

/// Uploads through the intermediary service as a multipart POST.
///
/// The service re-validates and holds the storage credentials; the client
/// never talks to object storage directly.
pub struct ServerProxiedTransport {
    client: UploadClient,
}

impl ServerProxiedTransport {
    pub fn new(client: UploadClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileTransport for ServerProxiedTransport {
    async fn upload(
        &self,
        file: &CandidateFile,
        progress: Option<ProgressFn>,
    ) -> Result<UploadedAttachment, UploadError> {
        policy::validate(&file.meta)?;

        let body = progress_body(file.bytes.clone(), progress);
        let mut part = multipart::Part::stream_with_length(body, file.meta.byte_size)
            .file_name(file.meta.name.clone());
        if !file.meta.mime_type.is_empty() {
            part = part
                .mime_str(&file.meta.mime_type)
                .map_err(|e| UploadError::InvalidRequest(format!("Invalid MIME type: {}", e)))?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .client()
            .post(self.client.upload_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_rejection(status, response).await);
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        Ok(UploadedAttachment {
            url: parsed.url,
            key: parsed.key,
            file_name: parsed.file_name,
            file_size: parsed.file_size,
        })
    }
}

/// Two-phase direct upload: acquire a presigned credential from the service,
/// then PUT the bytes straight to object storage.
///
/// Phase A failures abort before any data transfer. A Phase B failure leaves
/// an orphaned credential that simply expires; no cleanup call is made, and a
/// retry starts over with a fresh Phase A.
pub struct PresignedTransport {
    client: UploadClient,
    cancel: Option<CancellationToken>,
}

impl PresignedTransport {
    pub fn new(client: UploadClient) -> Self {
        Self {
            client,
            cancel: None,
        }
    }

    /// Attach an abort hook for the direct-write leg.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Phase A: request a credential scoped to this file's name, declared
    /// type, and size.
    async fn acquire_target(&self, meta: &FileMeta) -> Result<UploadTarget, UploadError> {
        let request = PresignedUrlRequest {
            file_name: meta.name.clone(),
            file_type: meta.mime_type.clone(),
            file_size: meta.byte_size,
        };

        let response = self
            .client
            .client()
            .post(self.client.presigned_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_rejection(status, response).await);
        }

        let parsed: PresignedUrlResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        Ok(UploadTarget::from_response(parsed, Utc::now()))
    }

    /// Phase B: write the raw bytes to the credential's URL. The
    /// `Content-Type` header must be exactly the type declared in Phase A; a
    /// mismatch is storage's cue to refuse the write, and is surfaced as a
    /// transport error rather than reconciled.
    async fn put_direct(
        &self,
        target: UploadTarget,
        file: &CandidateFile,
        progress: Option<ProgressFn>,
    ) -> Result<UploadedAttachment, UploadError> {
        if target.is_expired(Utc::now()) {
            return Err(UploadError::CredentialExpired);
        }

        let body = progress_body(file.bytes.clone(), progress);
        let request = self
            .client
            .client()
            .put(&target.put_url)
            .header(reqwest::header::CONTENT_TYPE, file.meta.mime_type.as_str())
            .body(body)
            .send();

        let result = match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(UploadError::Cancelled),
                result = request => result,
            },
            None => request.await,
        };

        let response = result.map_err(map_send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::StorageRejected {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(UploadedAttachment {
            url: target.public_url,
            key: target.object_key,
            file_name: file.meta.name.clone(),
            file_size: file.meta.byte_size,
        })
    }
}

#[async_trait]
impl FileTransport for PresignedTransport {
    async fn upload(
        &self,
        file: &CandidateFile,
        progress: Option<ProgressFn>,
    ) -> Result<UploadedAttachment, UploadError> {
        policy::validate(&file.meta)?;

        // A fresh credential per attempt; the target is consumed below and
        // can never be reused for another file or retry.
        let target = self.acquire_target(&file.meta).await?;
        self.put_direct(target, file, progress).await
    }

    fn acquires_credentials(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: u64) -> PresignedUrlResponse {
        PresignedUrlResponse {
            success: true,
            presigned_url: "https://bucket.s3.amazonaws.com/contact-files/k?X-Amz-Expires=300"
                .to_string(),
            file_url: "https://bucket.s3.amazonaws.com/contact-files/k".to_string(),
            key: "contact-files/k".to_string(),
            expires_in,
        }
    }

    #[test]
    fn target_expiry_window() {
        let issued_at = Utc::now();
        let target = UploadTarget::from_response(response(300), issued_at);

        assert!(!target.is_expired(issued_at));
        assert!(!target.is_expired(issued_at + Duration::seconds(299)));
        assert!(target.is_expired(issued_at + Duration::seconds(300)));
        assert!(target.is_expired(issued_at + Duration::seconds(301)));
    }

    #[tokio::test]
    async fn local_rejection_happens_before_any_network_call() {
        // Unroutable base URL: a network attempt would fail with Network,
        // but the policy rejects first.
        let client = UploadClient::new("http://127.0.0.1:1".to_string()).expect("client");
        let transport = ServerProxiedTransport::new(client);

        let file = CandidateFile::new("malware.exe", "application/pdf", Bytes::from_static(b"x"));
        let err = transport.upload(&file, None).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Rejected(RejectionReason::BadExtension)
        ));
    }

    #[tokio::test]
    async fn presigned_phase_a_failure_is_cheap() {
        // Phase A against an unreachable service: the error is a network
        // error from the credential request, not a storage error, proving no
        // data transfer was attempted.
        let client = UploadClient::new("http://127.0.0.1:1".to_string()).expect("client");
        let transport = PresignedTransport::new(client);

        let file = CandidateFile::new(
            "plan.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Bytes::from(vec![0u8; 1024]),
        );
        let err = transport.upload(&file, None).await.unwrap_err();
        assert!(matches!(err, UploadError::Network(_)));
    }

    #[test]
    fn transports_report_credential_acquisition() {
        let client = UploadClient::new("http://localhost:3000".to_string()).expect("client");
        assert!(!ServerProxiedTransport::new(client.clone()).acquires_credentials());
        assert!(PresignedTransport::new(client).acquires_credentials());
    }
}
