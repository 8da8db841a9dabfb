//! Filedrop API service
//!
//! The intermediary service of the attachment upload pipeline: it validates
//! candidate files server-side (clients are untrusted), writes them to object
//! storage on the server-proxied path, issues presigned PUT credentials on the
//! direct path, and forwards contact inquiries to the notification service.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;
