use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::models::{Order, OrderStatus};
use crate::store::{NewOrder, OrderRepository, StoreError};

/// In-memory repository with the same observable behavior as the file-backed
/// store. Used by the test suite; handy for local development too.
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_capabilities(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            clock,
            ids,
        }
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderStore {
    async fn create(&self, data: NewOrder) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let order = data.into_order(self.ids.generate(), self.clock.now());
        orders.push(order.clone());
        Ok(order)
    }

    async fn list(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.read().await.clone())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.payment_id == payment_id)
            .cloned())
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = self.clock.now();
        Ok(Some(order.clone()))
    }

    async fn delete(&self, order_id: &str) -> Result<bool, StoreError> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.order_id != order_id);
        Ok(orders.len() != before)
    }
}
