use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, FeeError};
use crate::fees::{calculate_with_default, round_money};
use crate::geo::calculate_distance;
use crate::models::quote::DeliveryQuote;
use crate::models::shop::GeoPoint;
use crate::state::AppState;

/// Price delivery of `subtotal` from the shop to `destination` using the
/// shop's stored configuration, or the default fee when it has none.
pub fn quote_delivery(
    state: &AppState,
    shop_id: Uuid,
    subtotal: Decimal,
    destination: &GeoPoint,
) -> Result<DeliveryQuote, AppError> {
    let start = Instant::now();

    match build_quote(state, shop_id, subtotal, destination) {
        Ok(quote) => {
            let outcome = if quote.fee.free_delivery_applied {
                state.metrics.free_deliveries_total.inc();
                "free"
            } else {
                "charged"
            };
            state
                .metrics
                .record_quote(outcome, start.elapsed().as_secs_f64());

            info!(
                shop_id = %shop_id,
                distance_meters = quote.distance_meters,
                fee = %quote.fee.final_fee,
                free_delivery = quote.fee.free_delivery_applied,
                "delivery quoted"
            );
            Ok(quote)
        }
        Err(err) => {
            state
                .metrics
                .record_quote("error", start.elapsed().as_secs_f64());
            warn!(shop_id = %shop_id, error = %err, "delivery quote failed");
            Err(err)
        }
    }
}

fn build_quote(
    state: &AppState,
    shop_id: Uuid,
    subtotal: Decimal,
    destination: &GeoPoint,
) -> Result<DeliveryQuote, AppError> {
    let origin = state
        .shops
        .get(&shop_id)
        .map(|shop| shop.location)
        .ok_or_else(|| AppError::NotFound(format!("shop {} not found", shop_id)))?;

    let distance_meters = calculate_distance(&origin, destination)?;

    // Clone out so no map guard is held while pricing.
    let config = state
        .delivery_configs
        .get(&shop_id)
        .map(|entry| entry.value().clone());

    if config.is_none() {
        info!(shop_id = %shop_id, "no delivery config; using default fee");
    }

    let fee = calculate_with_default(
        subtotal,
        distance_meters,
        config.as_ref(),
        state.auto_fee.as_ref(),
        state.default_delivery_fee,
    )?;

    let meets_least_order_value = config
        .as_ref()
        .is_none_or(|config| subtotal >= config.least_order_value);

    let order_total = subtotal
        .checked_add(fee.final_fee)
        .map(round_money)
        .ok_or_else(|| FeeError::InvalidAmount(format!("order total overflows for {subtotal}")))?;

    Ok(DeliveryQuote {
        shop_id,
        subtotal,
        distance_meters,
        fee,
        order_total,
        meets_least_order_value,
        quoted_at: Utc::now(),
    })
}
