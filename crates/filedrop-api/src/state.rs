//! Application state.
//!
//! Built once at startup and shared behind an `Arc`. The configuration is an
//! explicit struct (no module-level globals) so tests can construct the state
//! with fake credentials and a temp-dir storage backend.

use crate::services::email::EmailService;
use filedrop_core::Config;
use filedrop_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    /// SMTP notification service; `None` when SMTP is not configured, in
    /// which case the contact endpoint reports a configuration error.
    pub email: Option<EmailService>,
}
