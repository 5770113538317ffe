use std::env;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_GATEWAY_URL: &str = "https://api.razorpay.com";
const DEFAULT_EMAIL_URL: &str = "https://api.resend.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Root for durable state: `orders.json` plus the contact/feedback archives.
    pub data_dir: PathBuf,
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
    pub gateway_url: String,
    pub email_api_key: String,
    pub email_url: String,
    pub identity_signing_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let gateway_key_id =
            env::var("PAYMENT_GATEWAY_KEY_ID").context("PAYMENT_GATEWAY_KEY_ID must be set")?;
        let gateway_key_secret = env::var("PAYMENT_GATEWAY_KEY_SECRET")
            .context("PAYMENT_GATEWAY_KEY_SECRET must be set")?;
        let email_api_key = env::var("EMAIL_API_KEY").context("EMAIL_API_KEY must be set")?;
        let identity_signing_key =
            env::var("IDENTITY_SIGNING_KEY").context("IDENTITY_SIGNING_KEY must be set")?;

        let gateway_url =
            env::var("PAYMENT_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        let email_url = env::var("EMAIL_API_URL").unwrap_or_else(|_| DEFAULT_EMAIL_URL.to_string());

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        Ok(Self {
            host,
            port,
            data_dir,
            gateway_key_id,
            gateway_key_secret,
            gateway_url,
            email_api_key,
            email_url,
            identity_signing_key,
        })
    }
}
