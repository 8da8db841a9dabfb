//! Filedrop core library
//!
//! Shared domain types for the contact-attachment upload pipeline: the
//! attachment policy (size/extension/MIME rules), configuration, error types,
//! and the wire models used by both the API service and the upload client.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
