//! Contact submission flow.
//!
//! Collects form fields, drives the upload orchestrator, and hands the
//! successful attachment URLs plus the fields to the notification boundary.
//! Resubmission while a submission is in flight is refused here — the upload
//! pipeline itself assumes a single caller per batch.

use crate::batch::{upload_batch, UploadResult};
use crate::progress::{FileProgressFn, ProgressFn};
use crate::states::BatchState;
use crate::transport::{CandidateFile, FileTransport};
use crate::UploadClient;
use async_trait::async_trait;
use filedrop_core::models::{AttachmentRef, InquiryRequest};
use std::sync::atomic::{AtomicBool, Ordering};

/// Contact form fields as entered by the user.
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
}

/// The external notification service boundary. Receives the form fields and
/// the successfully uploaded attachment URLs; what happens behind it (email,
/// ticketing, ...) is opaque to the pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, inquiry: &InquiryRequest) -> anyhow::Result<()>;
}

/// Notifier that posts the inquiry to the Filedrop API's contact endpoint.
pub struct HttpNotifier {
    client: UploadClient,
}

impl HttpNotifier {
    pub fn new(client: UploadClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, inquiry: &InquiryRequest) -> anyhow::Result<()> {
        let response = self
            .client
            .client()
            .post(self.client.contact_endpoint())
            .json(inquiry)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach the contact endpoint: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Contact endpoint returned {}: {}", status, body);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Failed to deliver the inquiry: {0}")]
    Notification(#[source] anyhow::Error),
}

/// What a completed submission produced.
#[derive(Debug)]
pub struct SubmitReceipt {
    /// Attachments that uploaded successfully and were handed to the notifier.
    pub attachments: Vec<AttachmentRef>,
    /// Per-file failures; the user can remove and reselect these. They do not
    /// block the successfully uploaded attachments.
    pub failed: Vec<UploadResult>,
    /// Final per-file states for display.
    pub states: BatchState,
}

/// Drives one contact submission at a time.
pub struct ContactFlow<N: Notifier> {
    notifier: N,
    is_submitting: AtomicBool,
}

/// Clears the submitting flag on scope exit, including early error returns.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<N: Notifier> ContactFlow<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            is_submitting: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting.load(Ordering::SeqCst)
    }

    /// Upload the selected files and deliver the inquiry.
    ///
    /// Refuses to start while another submission is in flight. Upload
    /// failures never abort the submission; the inquiry is delivered with
    /// whatever uploaded successfully, and failures are reported in the
    /// receipt.
    pub async fn submit(
        &self,
        form: &ContactForm,
        files: &[CandidateFile],
        transport: &dyn FileTransport,
        on_file_progress: Option<FileProgressFn>,
        on_total_progress: Option<ProgressFn>,
    ) -> Result<SubmitReceipt, SubmitError> {
        if self.is_submitting.swap(true, Ordering::SeqCst) {
            return Err(SubmitError::SubmissionInProgress);
        }
        let _guard = SubmitGuard(&self.is_submitting);

        let mut states = BatchState::with_files(files.iter().map(|f| f.meta.clone()));
        states.begin(transport.acquires_credentials());

        let results = upload_batch(files, transport, on_file_progress, on_total_progress).await;
        states.apply_results(&results);

        let attachments: Vec<AttachmentRef> = results
            .iter()
            .filter(|result| result.success)
            .map(|result| AttachmentRef {
                url: result.url.clone().unwrap_or_default(),
                file_name: result.file_name.clone().unwrap_or_default(),
                file_size: result.file_size.unwrap_or_default(),
            })
            .collect();
        let failed: Vec<UploadResult> = results.into_iter().filter(|r| !r.success).collect();

        let inquiry = InquiryRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            company: form.company.clone(),
            message: form.message.clone(),
            attachments: attachments.clone(),
        };

        self.notifier
            .notify(&inquiry)
            .await
            .map_err(SubmitError::Notification)?;

        tracing::info!(
            attachments = attachments.len(),
            failed = failed.len(),
            "Contact inquiry submitted"
        );

        Ok(SubmitReceipt {
            attachments,
            failed,
            states,
        })
    }
}
