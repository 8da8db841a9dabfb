//! Client side of the attachment upload pipeline.
//!
//! Provides the `UploadClient` HTTP wrapper, the two upload transports
//! (server-proxied multipart and presigned-URL direct write) behind one
//! `FileTransport` interface, byte-level progress reporting, the sequential
//! batch orchestrator, and the contact submission flow that hands uploaded
//! attachment URLs to the notification boundary.

pub mod batch;
mod body;
pub mod contact;
pub mod progress;
pub mod states;
pub mod transport;

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub use batch::{upload_batch, UploadResult};
pub use contact::{ContactFlow, ContactForm, Notifier, SubmitError, SubmitReceipt};
pub use progress::{BatchProgress, FileProgressFn, ProgressFn};
pub use states::{BatchState, FileUploadState, UploadStatus};
pub use transport::{
    CandidateFile, FileTransport, PresignedTransport, ServerProxiedTransport, UploadError,
    UploadTarget, UploadedAttachment,
};

/// API version prefix (e.g. "/api/v0"). Set FILEDROP_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("FILEDROP_API_VERSION").unwrap_or_else(|_| "v0".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the Filedrop API.
#[derive(Clone, Debug)]
pub struct UploadClient {
    client: Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: FILEDROP_API_URL (default http://localhost:3000).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("FILEDROP_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Server-proxied upload endpoint.
    pub(crate) fn upload_endpoint(&self) -> String {
        self.build_url(&format!("{}/uploads", api_prefix()))
    }

    /// Presigned credential endpoint (Phase A of the presigned flow).
    pub(crate) fn presigned_endpoint(&self) -> String {
        self.build_url(&format!("{}/uploads/presigned", api_prefix()))
    }

    /// Contact inquiry endpoint.
    pub(crate) fn contact_endpoint(&self) -> String {
        self.build_url(&format!("{}/contact", api_prefix()))
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
