//! Per-file upload state tracking for the submission flow.
//!
//! Files can be added, removed, or reset only while the batch is idle. Once
//! submission begins the state is append-only: statuses move forward to a
//! terminal `Success` or `Error` and progress never regresses.

use crate::batch::UploadResult;
use filedrop_core::models::FileMeta;

/// Lifecycle of one file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    /// Presigned flow only: waiting for the write credential.
    GeneratingUrl,
    Uploading,
    Success,
    Error,
}

/// Tracked state of one candidate file.
#[derive(Debug, Clone)]
pub struct FileUploadState {
    pub meta: FileMeta,
    pub status: UploadStatus,
    pub progress_percent: u8,
    pub key: Option<String>,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl FileUploadState {
    fn new(meta: FileMeta) -> Self {
        Self {
            meta,
            status: UploadStatus::Idle,
            progress_percent: 0,
            key: None,
            url: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Batch submission has already started")]
    AlreadyStarted,
}

/// State of a whole batch, owned by the submission flow.
#[derive(Debug, Default)]
pub struct BatchState {
    files: Vec<FileUploadState>,
    started: bool,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(metas: impl IntoIterator<Item = FileMeta>) -> Self {
        Self {
            files: metas.into_iter().map(FileUploadState::new).collect(),
            started: false,
        }
    }

    pub fn files(&self) -> &[FileUploadState] {
        &self.files
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Add a selected file. Only valid before submission begins.
    pub fn add(&mut self, meta: FileMeta) -> Result<usize, StateError> {
        if self.started {
            return Err(StateError::AlreadyStarted);
        }
        self.files.push(FileUploadState::new(meta));
        Ok(self.files.len() - 1)
    }

    /// Remove a selected file (user removed/replaced it). Only valid before
    /// submission begins.
    pub fn remove(&mut self, index: usize) -> Result<(), StateError> {
        if self.started {
            return Err(StateError::AlreadyStarted);
        }
        if index < self.files.len() {
            self.files.remove(index);
        }
        Ok(())
    }

    /// Begin submission: every file leaves `Idle`. Presigned transports pass
    /// through `GeneratingUrl` first; the server-proxied path goes straight
    /// to `Uploading`.
    pub fn begin(&mut self, acquires_credentials: bool) {
        self.started = true;
        let initial = if acquires_credentials {
            UploadStatus::GeneratingUrl
        } else {
            UploadStatus::Uploading
        };
        for file in &mut self.files {
            file.status = initial;
        }
    }

    /// Record byte progress for one file; the first progress event moves a
    /// `GeneratingUrl` file to `Uploading`.
    pub fn set_progress(&mut self, index: usize, percent: u8) {
        if let Some(file) = self.files.get_mut(index) {
            if matches!(file.status, UploadStatus::GeneratingUrl | UploadStatus::Uploading) {
                file.status = UploadStatus::Uploading;
                file.progress_percent = file.progress_percent.max(percent.min(100));
            }
        }
    }

    /// Apply the orchestrator's results, moving every file to a terminal
    /// status.
    pub fn apply_results(&mut self, results: &[UploadResult]) {
        for (file, result) in self.files.iter_mut().zip(results) {
            if result.success {
                file.status = UploadStatus::Success;
                file.progress_percent = 100;
                file.key = result.key.clone();
                file.url = result.url.clone();
            } else {
                file.status = UploadStatus::Error;
                file.error = result.error.clone();
            }
        }
    }
}
