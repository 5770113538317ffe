#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use kiko_storefront_api::{
    clock::{Clock, IdGenerator},
    config::AppConfig,
    dto::orders::CompletePaymentRequest,
    gateway::PaymentGateway,
    mailer::{FallbackArchive, Mailer},
    middleware::auth::AuthUser,
    models::{OrderItem, ShippingAddress},
    state::AppState,
    store::MemoryOrderStore,
};

pub const GATEWAY_SECRET: &str = "test_gateway_secret";

/// A port nothing listens on, so provider calls fail without the network.
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

/// Deterministic clock that advances one second per observation, so
/// "strictly newer" assertions hold without sleeping.
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::seconds(tick)
    }
}

#[derive(Default)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) as u128;
        Uuid::from_u128(n + 1)
    }
}

pub fn test_state(data_dir: &Path) -> AppState {
    let clock = Arc::new(SteppingClock::new());
    let config = AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        gateway_key_id: "key_test".into(),
        gateway_key_secret: GATEWAY_SECRET.into(),
        gateway_url: DEAD_ENDPOINT.into(),
        email_api_key: "email_test".into(),
        email_url: DEAD_ENDPOINT.into(),
        identity_signing_key: "identity_test".into(),
    };
    AppState {
        orders: Arc::new(MemoryOrderStore::with_capabilities(
            clock.clone(),
            Arc::new(SequentialIds::default()),
        )),
        gateway: Arc::new(PaymentGateway::new(
            config.gateway_key_id.clone(),
            config.gateway_key_secret.clone(),
            config.gateway_url.clone(),
        )),
        mailer: Arc::new(Mailer::new(
            config.email_api_key.clone(),
            config.email_url.clone(),
        )),
        archive: Arc::new(FallbackArchive::new(&config.data_dir)),
        clock,
        config,
    }
}

pub fn sign(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(GATEWAY_SECRET.as_bytes()).unwrap();
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn user(user_id: &str) -> AuthUser {
    AuthUser {
        user_id: user_id.into(),
        email: Some(format!("{user_id}@example.com")),
        name: Some(user_id.into()),
        role: "user".into(),
    }
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: "admin_1".into(),
        email: Some("admin@example.com".into()),
        name: Some("Admin".into()),
        role: "admin".into(),
    }
}

pub fn payment_callback(order_id: &str, payment_id: &str, user_id: &str) -> CompletePaymentRequest {
    CompletePaymentRequest {
        gateway_order_id: order_id.into(),
        gateway_payment_id: payment_id.into(),
        signature: sign(order_id, payment_id),
        user_id: user_id.into(),
        user_email: format!("{user_id}@example.com"),
        user_name: user_id.into(),
        items: vec![OrderItem {
            id: "founder-edition".into(),
            name: "KIKO Robot Founder Edition".into(),
            price: 4999.0,
            quantity: 1,
        }],
        shipping_address: ShippingAddress {
            full_name: "Test Buyer".into(),
            email: format!("{user_id}@example.com"),
            phone: "+1 555 0100".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            country: "US".into(),
            postal_code: "62701".into(),
        },
        total_amount: 4999.0,
        currency: Some("USD".into()),
    }
}
