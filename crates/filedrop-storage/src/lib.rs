//! Filedrop storage library
//!
//! Storage abstraction for contact-form attachments: the `Storage` trait and
//! implementations for S3-compatible object storage and the local filesystem.
//!
//! # Object key format
//!
//! All attachments live under a single fixed prefix. Keys are generated by the
//! `keys` module as `contact-files/{uuid}_{timestamp}_{sanitized-name}` so a
//! hostile or colliding original filename can never address another object.
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filedrop_core::StorageBackend;
pub use keys::{generate_object_key, sanitize_file_name, KEY_PREFIX};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectInfo, ObjectMetadata, Storage, StorageError, StorageResult};
