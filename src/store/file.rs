use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::models::{Order, OrderStatus};
use crate::store::{NewOrder, OrderRepository, StoreError};

/// Orders persisted as a single pretty-printed JSON array. Every read loads
/// the whole collection and every mutation rewrites it wholesale, so writers
/// are serialized through `write_lock` to keep read-modify-write cycles from
/// interleaving.
pub struct FileOrderStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Mutex<()>,
}

impl FileOrderStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_capabilities(data_dir, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_capabilities(
        data_dir: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            path: data_dir.as_ref().join("orders.json"),
            clock,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Order>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Vec::new());
                }
                Ok(serde_json::from_slice(&bytes)?)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(StoreError::Read(err)),
        }
    }

    async fn write_all(&self, orders: &[Order]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(StoreError::Write)?;
        }
        let json = serde_json::to_vec_pretty(orders)?;
        fs::write(&self.path, json).await.map_err(StoreError::Write)
    }
}

#[async_trait]
impl OrderRepository for FileOrderStore {
    async fn create(&self, data: NewOrder) -> Result<Order, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;
        let order = data.into_order(self.ids.generate(), self.clock.now());
        orders.push(order.clone());
        self.write_all(&orders).await?;
        Ok(order)
    }

    async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.read_all().await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        let orders = self.read_all().await?;
        Ok(orders.into_iter().filter(|o| o.user_id == user_id).collect())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        let orders = self.read_all().await?;
        Ok(orders.into_iter().find(|o| o.order_id == order_id))
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<Order>, StoreError> {
        let orders = self.read_all().await?;
        Ok(orders.into_iter().find(|o| o.payment_id == payment_id))
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;
        let Some(order) = orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = self.clock.now();
        let updated = order.clone();
        self.write_all(&orders).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, order_id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.read_all().await?;
        let before = orders.len();
        orders.retain(|o| o.order_id != order_id);
        if orders.len() == before {
            return Ok(false);
        }
        self.write_all(&orders).await?;
        Ok(true)
    }
}
