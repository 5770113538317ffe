use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to payment gateway failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("payment gateway rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Remote order handle as the gateway reports it; `amount` is in the
/// gateway's smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Adapter over the external payment processor. Holds the only copy of the
/// shared secret; the secret is used for basic auth on order minting and for
/// verifying callback signatures, and never reaches the browser.
pub struct PaymentGateway {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentGateway {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.gateway_key_id.clone(),
            config.gateway_key_secret.clone(),
            config.gateway_url.clone(),
        )
    }

    /// Key id the browser needs to open the gateway's checkout widget.
    pub fn checkout_key(&self) -> &str {
        &self.key_id
    }

    /// Mints a remote order for `amount` major units. The conversion to
    /// minor units is always x100 with round-to-nearest, whatever the
    /// currency; zero- and three-decimal currencies are not handled.
    pub async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        receipt: String,
        notes: serde_json::Value,
    ) -> Result<GatewayOrder, GatewayError> {
        let body = serde_json::json!({
            "amount": to_minor_units(amount),
            "currency": currency,
            "receipt": receipt,
            "notes": notes,
            "payment_capture": 1,
        });

        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = api_error_message(response.text().await.unwrap_or_default());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Recomputes `HMAC-SHA256(secret, "<order_id>|<payment_id>")` as
    /// lowercase hex and compares it with the supplied signature.
    pub fn signature_matches(&self, order_id: &str, payment_id: &str, supplied: &str) -> bool {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());
        expected == supplied
    }
}

pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/description")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body)
}
