use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of pricing one delivery. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_fee: Decimal,
    pub surcharge: Decimal,
    pub final_fee: Decimal,
    pub free_delivery_applied: bool,
}

impl FeeBreakdown {
    pub fn flat(fee: Decimal) -> Self {
        Self {
            base_fee: fee,
            surcharge: Decimal::ZERO,
            final_fee: fee,
            free_delivery_applied: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryQuote {
    pub shop_id: Uuid,
    pub subtotal: Decimal,
    pub distance_meters: f64,
    pub fee: FeeBreakdown,
    pub order_total: Decimal,
    /// False when the subtotal is under the shop's least order value and
    /// checkout has to refuse the order.
    pub meets_least_order_value: bool,
    pub quoted_at: DateTime<Utc>,
}
