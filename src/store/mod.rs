use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Order, OrderItem, OrderStatus, ShippingAddress};

pub mod file;
pub mod memory;

pub use file::FileOrderStore;
pub use memory::MemoryOrderStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read order collection: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write order collection: {0}")]
    Write(#[source] std::io::Error),

    #[error("order collection is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Everything an order carries except what the store assigns at creation
/// (internal id, timestamps, and the `pending` default status).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub payment_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub total_amount: f64,
    pub currency: String,
    pub status: Option<OrderStatus>,
}

impl NewOrder {
    pub(crate) fn into_order(self, id: Uuid, now: DateTime<Utc>) -> Order {
        Order {
            id,
            order_id: self.order_id,
            payment_id: self.payment_id,
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            items: self.items,
            shipping_address: self.shipping_address,
            total_amount: self.total_amount,
            currency: self.currency,
            status: self.status.unwrap_or(OrderStatus::Pending),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Durable record of orders. The repository is the sole writer of persisted
/// order state; lookups by gateway order id key the admin operations, the
/// payment-id lookup keys idempotent creation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, data: NewOrder) -> Result<Order, StoreError>;

    /// All orders in storage order; callers wanting recency sort explicitly.
    async fn list(&self) -> Result<Vec<Order>, StoreError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, StoreError>;

    /// Replaces the status and refreshes `updated_at`, keyed by gateway order
    /// id. Returns `None` when no order matches.
    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError>;

    /// Hard delete, keyed by gateway order id. Returns whether a record was
    /// removed.
    async fn delete(&self, order_id: &str) -> Result<bool, StoreError>;
}
