use rust_decimal::prelude::*;

use crate::error::FeeError;
use crate::models::delivery_config::DistanceTier;

/// Largest unit count an `f64` still holds exactly (2^53).
const MAX_EXACT_UNITS: f64 = 9_007_199_254_740_992.0;

/// Fee for `distance_meters` under ascending `tiers`.
///
/// A distance exactly on a tier's `max_distance` belongs to that tier. Past the
/// last tier every started `unit_meters` adds `fee_per_unit`.
pub fn tier_fee(
    tiers: &[DistanceTier],
    distance_meters: f64,
    fee_per_unit: Decimal,
    unit_meters: f64,
) -> Result<Decimal, FeeError> {
    if let Some(tier) = tiers.iter().find(|tier| distance_meters <= tier.max_distance) {
        return Ok(tier.fee);
    }

    let last = tiers.last().ok_or_else(|| {
        FeeError::InvalidTierConfig("no distance tiers configured".to_string())
    })?;

    if fee_per_unit.is_zero() {
        return Ok(last.fee);
    }

    let units = ((distance_meters - last.max_distance) / unit_meters).ceil();
    let units = if units.is_finite() && units <= MAX_EXACT_UNITS {
        Decimal::from_f64(units)
    } else {
        None
    }
    .ok_or_else(|| {
        FeeError::InvalidAmount(format!(
            "distance {distance_meters} m is too far past the last tier to price"
        ))
    })?;

    units
        .checked_mul(fee_per_unit)
        .and_then(|extra| last.fee.checked_add(extra))
        .ok_or_else(|| {
            FeeError::InvalidAmount(format!("beyond-tier fee overflows at {distance_meters} m"))
        })
}
