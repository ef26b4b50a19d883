use rust_decimal::Decimal;

use crate::error::FeeError;
use crate::models::delivery_config::DeliveryLogicConfig;

/// Prices the base fee for shops running in `auto` distance mode.
///
/// The calculator owns surcharge and free-delivery handling; implementations
/// only answer "what does this distance cost".
pub trait AutoFeeStrategy: Send + Sync {
    fn base_fee(
        &self,
        subtotal: Decimal,
        distance_meters: f64,
        config: &DeliveryLogicConfig,
    ) -> Result<Decimal, FeeError>;
}

/// Same fee regardless of distance.
#[derive(Debug, Clone, Copy)]
pub struct FlatAutoFee(pub Decimal);

impl AutoFeeStrategy for FlatAutoFee {
    fn base_fee(
        &self,
        _subtotal: Decimal,
        _distance_meters: f64,
        _config: &DeliveryLogicConfig,
    ) -> Result<Decimal, FeeError> {
        Ok(self.0)
    }
}

/// Used when no automatic pricing source is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAutoFee;

impl AutoFeeStrategy for NoAutoFee {
    fn base_fee(
        &self,
        _subtotal: Decimal,
        _distance_meters: f64,
        config: &DeliveryLogicConfig,
    ) -> Result<Decimal, FeeError> {
        Err(FeeError::AutoFeeUnavailable(format!(
            "shop {} uses auto distance mode but no automatic fee source is configured",
            config.shop_id
        )))
    }
}
