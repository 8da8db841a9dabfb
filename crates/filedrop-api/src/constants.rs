//! API-wide constants.

/// API path prefix for all versioned routes.
pub const API_PREFIX: &str = "/api/v0";

/// Slack allowed on top of the attachment size limit for multipart framing
/// and form fields before the body limit rejects a request outright.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Server-level cap on in-flight requests.
pub const HTTP_CONCURRENCY_LIMIT: usize = 1024;
