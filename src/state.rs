use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::fees::{AutoFeeStrategy, DEFAULT_DELIVERY_FEE, FlatAutoFee, NoAutoFee};
use crate::models::delivery_config::{ConfigEvent, DeliveryLogicConfig};
use crate::models::shop::Shop;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub shops: DashMap<Uuid, Shop>,
    pub delivery_configs: DashMap<Uuid, DeliveryLogicConfig>,
    pub config_events_tx: broadcast::Sender<ConfigEvent>,
    pub auto_fee: Arc<dyn AutoFeeStrategy>,
    pub default_delivery_fee: Decimal,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, auto_fee: Arc<dyn AutoFeeStrategy>) -> Self {
        let (config_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            shops: DashMap::new(),
            delivery_configs: DashMap::new(),
            config_events_tx,
            auto_fee,
            default_delivery_fee: DEFAULT_DELIVERY_FEE,
            metrics: Metrics::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let auto_fee: Arc<dyn AutoFeeStrategy> = match config.auto_flat_delivery_fee {
            Some(fee) => Arc::new(FlatAutoFee(fee)),
            None => Arc::new(NoAutoFee),
        };

        let mut state = Self::new(config.event_buffer_size, auto_fee);
        state.default_delivery_fee = config.default_delivery_fee;
        state
    }
}
