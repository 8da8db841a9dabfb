//! Configuration module
//!
//! Environment-backed configuration, read once at startup into an explicit
//! struct and passed by reference into the storage and notification layers.
//! No module-level singletons: tests construct a `Config` directly with fake
//! credentials.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,

    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    /// Validity window for presigned PUT credentials, in seconds.
    pub presign_expiry_secs: u64,

    // Contact notification (SMTP) configuration
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    /// Recipients for contact inquiries.
    pub contact_recipients: Vec<String>,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => Some(StorageBackend::from_str(&s)?),
            Err(_) => None,
        };

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            cors_origins: env_list("CORS_ORIGINS"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            presign_expiry_secs: env_parse("PRESIGN_EXPIRY_SECS", DEFAULT_PRESIGN_EXPIRY_SECS)?,
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|p| p.parse().ok()),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            smtp_tls: env::var("SMTP_TLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            contact_recipients: env_list("CONTACT_RECIPIENTS"),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Region to use for S3, preferring S3_REGION over AWS_REGION.
    pub fn s3_region_or_aws(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 3000,
            cors_origins: vec![],
            environment: "test".to_string(),
            storage_backend: Some(StorageBackend::Local),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: Some("ap-northeast-2".to_string()),
            local_storage_path: Some("/tmp/filedrop".to_string()),
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

    #[test]
    fn production_detection() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn s3_region_falls_back_to_aws_region() {
        let mut config = test_config();
        assert_eq!(config.s3_region_or_aws(), Some("ap-northeast-2"));
        config.s3_region = Some("us-east-1".to_string());
        assert_eq!(config.s3_region_or_aws(), Some("us-east-1"));
    }
}
