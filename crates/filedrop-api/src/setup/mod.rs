//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs so the
//! integration tests can build the same router against a test state.

pub mod routes;
pub mod server;
pub mod storage;

use crate::services::email::EmailService;
use crate::state::AppState;
use anyhow::Result;
use filedrop_core::Config;
use std::sync::Arc;

/// Initialize tracing with an env-filter (RUST_LOG).
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filedrop_api=debug"));

    fmt().with_env_filter(filter).init();
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = storage::setup_storage(&config).await?;

    let email = EmailService::from_config(&config);
    if email.is_none() {
        tracing::warn!("SMTP not configured; contact inquiries will be rejected");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        email,
    });

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
