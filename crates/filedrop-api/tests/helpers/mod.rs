//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p filedrop-api`. Uses a TempDir-backed
//! LocalStorage so no external services are needed.

use axum_test::TestServer;
use filedrop_api::services::email::EmailService;
use filedrop_api::setup::routes;
use filedrop_api::state::AppState;
use filedrop_core::{Config, StorageBackend};
use filedrop_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn Storage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(storage_dir: &TempDir) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec![],
        environment: "test".to_string(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:3000/files".to_string()),
        presign_expiry_secs: 300,
        smtp_host: None,
        smtp_port: None,
        smtp_user: None,
        smtp_password: None,
        smtp_from: None,
        smtp_tls: true,
        contact_recipients: vec![],
    }
}

/// Build a test app over a TempDir-backed LocalStorage, without SMTP.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = test_config(&temp_dir);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            temp_dir.path(),
            config.local_storage_base_url.clone().expect("base url"),
        )
        .await
        .expect("create local storage"),
    );

    let email: Option<EmailService> = None;

    let state = Arc::new(AppState {
        config: config.clone(),
        storage: storage.clone(),
        email,
    });

    let router = routes::setup_routes(&config, state);
    let server = TestServer::new(router).expect("create test server");

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}
