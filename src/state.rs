use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::gateway::PaymentGateway;
use crate::mailer::{FallbackArchive, Mailer};
use crate::store::{FileOrderStore, OrderRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub orders: Arc<dyn OrderRepository>,
    pub gateway: Arc<PaymentGateway>,
    pub mailer: Arc<Mailer>,
    pub archive: Arc<FallbackArchive>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Production wiring: file-backed store and live provider adapters,
    /// everything rooted at `config.data_dir`.
    pub fn from_config(config: AppConfig) -> Self {
        let orders = Arc::new(FileOrderStore::new(&config.data_dir));
        let gateway = Arc::new(PaymentGateway::from_config(&config));
        let mailer = Arc::new(Mailer::from_config(&config));
        let archive = Arc::new(FallbackArchive::new(&config.data_dir));
        Self {
            config,
            orders,
            gateway,
            mailer,
            archive,
            clock: Arc::new(SystemClock),
        }
    }
}
