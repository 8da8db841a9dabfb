//! Sequential batch orchestration.
//!
//! Files upload strictly one at a time, in input order, bounding peak
//! bandwidth and memory (each file is held as one whole blob). Every failure
//! mode is converted into a per-file result; the batch always completes with
//! exactly one result per input file, in the same order.

use crate::progress::{BatchProgress, FileProgressFn, ProgressFn};
use crate::transport::{FileTransport, UploadedAttachment};
use std::sync::Arc;

/// Outcome of one file within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub url: Option<String>,
    pub key: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(attachment: UploadedAttachment) -> Self {
        Self {
            success: true,
            url: Some(attachment.url),
            key: Some(attachment.key),
            file_name: Some(attachment.file_name),
            file_size: Some(attachment.file_size),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            key: None,
            file_name: None,
            file_size: None,
            error: Some(error.into()),
        }
    }
}

/// Upload a batch of files through the given transport.
///
/// One bad file never aborts the batch: a validation or transport failure
/// becomes that file's `UploadResult` and processing moves to the next file.
/// Retries are the caller's responsibility (and, on the presigned path, go
/// through a fresh credential).
pub async fn upload_batch(
    files: &[crate::transport::CandidateFile],
    transport: &dyn FileTransport,
    on_file_progress: Option<FileProgressFn>,
    on_total_progress: Option<ProgressFn>,
) -> Vec<UploadResult> {
    let progress = Arc::new(BatchProgress::new(files.len()));
    let mut results = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let per_file_progress: ProgressFn = {
            let progress = Arc::clone(&progress);
            let on_file_progress = on_file_progress.clone();
            let on_total_progress = on_total_progress.clone();
            Arc::new(move |percent: u8| {
                let snapshot = progress.observe(index, percent);
                if let Some(ref on_file) = on_file_progress {
                    on_file(index, snapshot.file_percent);
                }
                if let Some(ref on_total) = on_total_progress {
                    on_total(snapshot.overall_percent);
                }
            })
        };

        match transport.upload(file, Some(per_file_progress)).await {
            Ok(attachment) => {
                let snapshot = progress.complete(index);
                if let Some(ref on_file) = on_file_progress {
                    on_file(index, 100);
                }
                if let Some(ref on_total) = on_total_progress {
                    on_total(snapshot.overall_percent);
                }
                results.push(UploadResult::succeeded(attachment));
            }
            Err(error) => {
                tracing::warn!(
                    file_name = %file.meta.name,
                    index,
                    error = %error,
                    "File upload failed; continuing with the rest of the batch"
                );
                results.push(UploadResult::failed(error.to_string()));
            }
        }
    }

    results
}
