//! Email service for delivering contact inquiries via SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use filedrop_core::Config;

/// SMTP-backed notification service.
/// Absent (`None`) when SMTP is not configured.
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailService {
    /// Create the email service from config. Returns `None` if SMTP_HOST or
    /// SMTP_FROM is missing.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let port = config.smtp_port.unwrap_or(587);

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(
                host = %host,
                port = port,
                "Email service initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (&config.smtp_user, &config.smtp_password) {
                b.credentials(Credentials::new(u.clone(), p.clone()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    /// Send a plain-text email to the given recipients.
    pub async fn send(&self, to: &[String], subject: &str, body_plain: &str) -> Result<(), String> {
        if to.is_empty() {
            return Ok(());
        }
        let to_addrs: Vec<Mailbox> = to.iter().filter_map(|s| s.parse().ok()).collect::<Vec<_>>();
        if to_addrs.is_empty() {
            return Err("No valid recipient addresses".to_string());
        }
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| format!("Invalid SMTP_FROM: {}", e))?;

        let mut builder = Message::builder().from(from_addr).subject(subject);
        for mb in &to_addrs {
            builder = builder.to(mb.clone());
        }
        let email = builder
            .header(ContentType::TEXT_PLAIN)
            .body(body_plain.to_string())
            .map_err(|e| e.to_string())?;

        self.mailer.send(email).await.map_err(|e| e.to_string())?;
        info!(count = to.len(), "Contact inquiry email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedrop_core::StorageBackend;

    fn config_without_smtp() -> Config {
        Config {
            server_port: 3000,
            cors_origins: vec![],
            environment: "test".to_string(),
            storage_backend: Some(StorageBackend::Local),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
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

    /// EmailService::from_config returns None when SMTP is not configured.
    #[test]
    fn from_config_returns_none_without_smtp() {
        assert!(EmailService::from_config(&config_without_smtp()).is_none());
    }

    #[test]
    fn from_config_builds_when_host_and_from_present() {
        let mut config = config_without_smtp();
        config.smtp_host = Some("localhost".to_string());
        config.smtp_from = Some("noreply@example.com".to_string());
        config.smtp_tls = false;
        assert!(EmailService::from_config(&config).is_some());
    }
}
