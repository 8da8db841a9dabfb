//! Storage setup and initialization

use anyhow::Result;
use filedrop_core::Config;
use filedrop_storage::{create_storage, Storage};
use std::sync::Arc;

/// Set up the storage backend. Missing configuration is fatal at startup.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage backend initialized successfully"
    );
    Ok(storage)
}
