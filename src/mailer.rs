use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("request to email provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("email provider rejected the message ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendReceipt {
    id: String,
}

/// Adapter over the transactional email provider's REST API.
pub struct Mailer {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Mailer {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.email_api_key.clone(), config.email_url.clone())
    }

    /// Submits one message; returns the provider's message id.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<SendReceipt>().await?.id)
    }
}

/// Timestamped JSON archive for submitted payloads. Doubles as the fallback
/// path when the provider is down, so submissions are never lost outright.
pub struct FallbackArchive {
    root: PathBuf,
}

impl FallbackArchive {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub async fn save(
        &self,
        dir: &str,
        prefix: &str,
        stamp: DateTime<Utc>,
        payload: &serde_json::Value,
    ) -> std::io::Result<PathBuf> {
        let target = self.root.join(dir);
        fs::create_dir_all(&target).await?;
        let path = target.join(format!("{prefix}-{}.json", stamp.timestamp_millis()));
        let json = serde_json::to_vec_pretty(payload).map_err(std::io::Error::other)?;
        fs::write(&path, json).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn email_serializes_to_the_provider_shape() {
        let email = OutgoingEmail {
            from: "Storefront <no-reply@example.com>".into(),
            to: vec!["inbox@example.com".into()],
            reply_to: None,
            subject: "Hello".into(),
            text: "body".into(),
            html: None,
        };
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["from"], "Storefront <no-reply@example.com>");
        assert_eq!(value["to"][0], "inbox@example.com");
        // Optional fields stay off the wire entirely when unset.
        assert!(value.get("reply_to").is_none());
        assert!(value.get("html").is_none());
    }

    #[tokio::test]
    async fn archived_payloads_are_reconstructable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let archive = FallbackArchive::new(dir.path());
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let payload = serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "When does the founder edition ship?",
        });

        let path = archive.save("contacts", "contact", stamp, &payload).await?;
        assert!(path.ends_with(format!("contact-{}.json", stamp.timestamp_millis())));

        let raw = tokio::fs::read(&path).await?;
        let restored: serde_json::Value = serde_json::from_slice(&raw)?;
        assert_eq!(restored, payload);
        Ok(())
    }
}
