//! Delivery fee calculation.
//!
//! Rules apply in a fixed order: small-order surcharge, free-delivery
//! override, then the distance price (tiers in `custom` mode, the injected
//! [`AutoFeeStrategy`] in `auto` mode). Everything here is a pure function of
//! its arguments.

pub mod strategy;
pub mod tiers;

use rust_decimal::prelude::*;

use crate::error::FeeError;
use crate::models::delivery_config::{DeliveryLogicConfig, DistanceMode};
use crate::models::quote::FeeBreakdown;

pub use strategy::{AutoFeeStrategy, FlatAutoFee, NoAutoFee};

/// Charged when a shop has no delivery configuration at all.
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value to cents, half away from zero.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price the delivery of an order worth `subtotal` over `distance_meters`.
///
/// With no `config` the shop gets [`DEFAULT_DELIVERY_FEE`].
pub fn calculate_total_delivery_fee(
    subtotal: Decimal,
    distance_meters: f64,
    config: Option<&DeliveryLogicConfig>,
    auto: &dyn AutoFeeStrategy,
) -> Result<FeeBreakdown, FeeError> {
    calculate_with_default(subtotal, distance_meters, config, auto, DEFAULT_DELIVERY_FEE)
}

/// Same as [`calculate_total_delivery_fee`] with an explicit fallback fee for
/// unconfigured shops.
pub fn calculate_with_default(
    subtotal: Decimal,
    distance_meters: f64,
    config: Option<&DeliveryLogicConfig>,
    auto: &dyn AutoFeeStrategy,
    default_fee: Decimal,
) -> Result<FeeBreakdown, FeeError> {
    if subtotal.is_sign_negative() && !subtotal.is_zero() {
        return Err(FeeError::InvalidAmount(format!(
            "subtotal must be non-negative, got {subtotal}"
        )));
    }
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(FeeError::InvalidAmount(format!(
            "distance must be a finite non-negative number of meters, got {distance_meters}"
        )));
    }

    let Some(config) = config else {
        return Ok(FeeBreakdown::flat(round_money(default_fee)));
    };
    config.validate()?;

    let surcharge = if subtotal < config.minimum_order_value {
        config.small_order_surcharge
    } else {
        Decimal::ZERO
    };

    if qualifies_for_free_delivery(subtotal, distance_meters, config) {
        return Ok(FeeBreakdown {
            base_fee: Decimal::ZERO,
            surcharge,
            final_fee: Decimal::ZERO,
            free_delivery_applied: true,
        });
    }

    let (base_fee, cap) = match config.distance_mode {
        DistanceMode::Custom => {
            let fee = tiers::tier_fee(
                &config.distance_tiers,
                distance_meters,
                config.beyond_tier_fee_per_unit,
                config.beyond_tier_distance_unit,
            )?;
            let fee = match config.max_delivery_fee {
                Some(cap) => fee.min(cap),
                None => fee,
            };
            (fee, config.max_delivery_fee)
        }
        DistanceMode::Auto => (
            auto.base_fee(subtotal, distance_meters, config)?
                .max(Decimal::ZERO),
            None,
        ),
    };

    let mut final_fee = base_fee + surcharge;
    if let Some(cap) = cap {
        final_fee = final_fee.min(cap);
    }

    Ok(FeeBreakdown {
        base_fee: round_money(base_fee),
        surcharge,
        final_fee: round_money(final_fee),
        free_delivery_applied: false,
    })
}

/// Both the threshold and the radius must be configured and met.
fn qualifies_for_free_delivery(
    subtotal: Decimal,
    distance_meters: f64,
    config: &DeliveryLogicConfig,
) -> bool {
    match (config.free_delivery_threshold, config.free_delivery_radius) {
        (Some(threshold), Some(radius)) => subtotal >= threshold && distance_meters <= radius,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::{
        AutoFeeStrategy, DEFAULT_DELIVERY_FEE, FlatAutoFee, NoAutoFee,
        calculate_total_delivery_fee, calculate_with_default,
    };
    use crate::error::FeeError;
    use crate::models::delivery_config::{DeliveryLogicConfig, DistanceMode, DistanceTier};
    use crate::models::quote::FeeBreakdown;

    fn custom_config() -> DeliveryLogicConfig {
        DeliveryLogicConfig {
            shop_id: Uuid::from_u128(7),
            minimum_order_value: dec!(15),
            small_order_surcharge: dec!(2.50),
            least_order_value: dec!(5),
            distance_mode: DistanceMode::Custom,
            distance_tiers: vec![
                DistanceTier {
                    max_distance: 200.0,
                    fee: dec!(20),
                },
                DistanceTier {
                    max_distance: 400.0,
                    fee: dec!(30),
                },
            ],
            max_delivery_fee: Some(dec!(45)),
            beyond_tier_fee_per_unit: dec!(5),
            beyond_tier_distance_unit: 100.0,
            free_delivery_threshold: Some(dec!(100)),
            free_delivery_radius: Some(300.0),
            updated_at: Utc::now(),
        }
    }

    fn quote(subtotal: Decimal, distance: f64) -> FeeBreakdown {
        calculate_total_delivery_fee(subtotal, distance, Some(&custom_config()), &NoAutoFee)
            .unwrap()
    }

    #[test]
    fn tier_boundary_is_inclusive() {
        let fee = quote(dec!(50), 200.0);
        assert_eq!(fee.base_fee, dec!(20));
        assert_eq!(fee.final_fee, dec!(20));
        assert!(!fee.free_delivery_applied);
    }

    #[test]
    fn past_last_tier_charges_beyond_tier_fee() {
        let fee = quote(dec!(50), 401.0);
        assert_eq!(fee.base_fee, dec!(35));
        assert_eq!(fee.final_fee, dec!(35));
    }

    #[test]
    fn small_order_adds_surcharge_exactly() {
        let fee = quote(dec!(14.99), 150.0);
        assert_eq!(fee.surcharge, dec!(2.50));
        assert_eq!(fee.base_fee, dec!(20));
        assert_eq!(fee.final_fee, dec!(22.50));
    }

    #[test]
    fn order_at_minimum_has_no_surcharge() {
        let fee = quote(dec!(15), 150.0);
        assert_eq!(fee.surcharge, Decimal::ZERO);
    }

    #[test]
    fn free_delivery_zeroes_fee_inside_radius() {
        let fee = quote(dec!(100), 300.0);
        assert!(fee.free_delivery_applied);
        assert_eq!(fee.base_fee, Decimal::ZERO);
        assert_eq!(fee.final_fee, Decimal::ZERO);
    }

    #[test]
    fn free_delivery_needs_both_threshold_and_radius() {
        assert!(!quote(dec!(100), 300.5).free_delivery_applied);
        assert!(!quote(dec!(99.99), 100.0).free_delivery_applied);

        let mut cfg = custom_config();
        cfg.free_delivery_radius = None;
        let fee = calculate_total_delivery_fee(dec!(500), 10.0, Some(&cfg), &NoAutoFee).unwrap();
        assert!(!fee.free_delivery_applied);
    }

    #[test]
    fn free_delivery_waives_surcharge_but_reports_it() {
        let mut cfg = custom_config();
        cfg.free_delivery_threshold = Some(dec!(10));
        let fee = calculate_total_delivery_fee(dec!(12), 50.0, Some(&cfg), &NoAutoFee).unwrap();
        assert!(fee.free_delivery_applied);
        assert_eq!(fee.surcharge, dec!(2.50));
        assert_eq!(fee.final_fee, Decimal::ZERO);
    }

    #[test]
    fn fee_is_capped_at_max_delivery_fee() {
        let fee = quote(dec!(10), 5_000.0);
        assert_eq!(fee.final_fee, dec!(45));
        assert_eq!(fee.base_fee, dec!(45));

        let fee = quote(dec!(50), 5_000.0);
        assert_eq!(fee.base_fee, dec!(45));
        assert_eq!(fee.final_fee, dec!(45));
    }

    #[test]
    fn custom_fee_without_cap_charges_full_beyond_tier_fee() {
        let mut cfg = custom_config();
        cfg.max_delivery_fee = None;

        // 4600 m past the 400 m tier: 46 units at 5.
        let fee = calculate_total_delivery_fee(dec!(50), 5_000.0, Some(&cfg), &NoAutoFee).unwrap();
        assert_eq!(fee.base_fee, dec!(260));
        assert_eq!(fee.final_fee, dec!(260));

        let fee = calculate_total_delivery_fee(dec!(10), 5_000.0, Some(&cfg), &NoAutoFee).unwrap();
        assert_eq!(fee.final_fee, dec!(262.50));
    }

    #[test]
    fn custom_fee_stays_within_bounds() {
        let cfg = custom_config();
        let cap = cfg.max_delivery_fee.unwrap();
        let subtotals = [dec!(0), dec!(5), dec!(14.99), dec!(15), dec!(99.99), dec!(100), dec!(1000)];
        let distances = [0.0, 1.0, 199.9, 200.0, 300.0, 400.0, 401.0, 999.0, 25_000.0];

        for subtotal in subtotals {
            for distance in distances {
                let fee =
                    calculate_total_delivery_fee(subtotal, distance, Some(&cfg), &NoAutoFee).unwrap();
                assert!(fee.final_fee >= Decimal::ZERO, "{subtotal} @ {distance}");
                assert!(fee.final_fee <= cap, "{subtotal} @ {distance}");
                assert!(fee.base_fee <= cap, "{subtotal} @ {distance}");
                if subtotal < cfg.minimum_order_value {
                    assert_eq!(fee.surcharge, cfg.small_order_surcharge);
                }
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_breakdowns() {
        let cfg = custom_config();
        let first = calculate_total_delivery_fee(dec!(42.10), 333.3, Some(&cfg), &NoAutoFee).unwrap();
        let second = calculate_total_delivery_fee(dec!(42.10), 333.3, Some(&cfg), &NoAutoFee).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_config_falls_back_to_default_fee() {
        let fee = calculate_total_delivery_fee(dec!(3), 10_000.0, None, &NoAutoFee).unwrap();
        assert_eq!(fee, FeeBreakdown::flat(DEFAULT_DELIVERY_FEE));

        let fee = calculate_with_default(dec!(3), 10.0, None, &NoAutoFee, dec!(3.99)).unwrap();
        assert_eq!(fee.final_fee, dec!(3.99));
    }

    #[test]
    fn auto_mode_uses_injected_strategy() {
        let mut cfg = custom_config();
        cfg.distance_mode = DistanceMode::Auto;
        cfg.free_delivery_threshold = None;

        let fee = calculate_total_delivery_fee(dec!(10), 1_000.0, Some(&cfg), &FlatAutoFee(dec!(7)))
            .unwrap();
        assert_eq!(fee.base_fee, dec!(7));
        assert_eq!(fee.surcharge, dec!(2.50));
        assert_eq!(fee.final_fee, dec!(9.50));
    }

    #[test]
    fn auto_mode_without_strategy_is_unavailable() {
        let mut cfg = custom_config();
        cfg.distance_mode = DistanceMode::Auto;
        let result = calculate_total_delivery_fee(dec!(20), 1_000.0, Some(&cfg), &NoAutoFee);
        assert!(matches!(result, Err(FeeError::AutoFeeUnavailable(_))));
    }

    #[test]
    fn auto_mode_still_honours_free_delivery() {
        let mut cfg = custom_config();
        cfg.distance_mode = DistanceMode::Auto;
        let fee = calculate_total_delivery_fee(dec!(150), 100.0, Some(&cfg), &NoAutoFee).unwrap();
        assert!(fee.free_delivery_applied);
    }

    #[test]
    fn negative_strategy_fee_is_clamped_to_zero() {
        struct Refund;
        impl AutoFeeStrategy for Refund {
            fn base_fee(
                &self,
                _subtotal: Decimal,
                _distance_meters: f64,
                _config: &DeliveryLogicConfig,
            ) -> Result<Decimal, FeeError> {
                Ok(dec!(-4))
            }
        }

        let mut cfg = custom_config();
        cfg.distance_mode = DistanceMode::Auto;
        let fee = calculate_total_delivery_fee(dec!(50), 1_000.0, Some(&cfg), &Refund).unwrap();
        assert_eq!(fee.final_fee, Decimal::ZERO);
    }

    #[test]
    fn malformed_tiers_are_rejected() {
        let mut cfg = custom_config();
        cfg.distance_tiers.reverse();
        let result = calculate_total_delivery_fee(dec!(50), 100.0, Some(&cfg), &NoAutoFee);
        assert!(matches!(result, Err(FeeError::InvalidTierConfig(_))));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let cfg = custom_config();
        assert!(matches!(
            calculate_total_delivery_fee(dec!(-1), 100.0, Some(&cfg), &NoAutoFee),
            Err(FeeError::InvalidAmount(_))
        ));
        assert!(matches!(
            calculate_total_delivery_fee(dec!(10), f64::NAN, Some(&cfg), &NoAutoFee),
            Err(FeeError::InvalidAmount(_))
        ));
        assert!(matches!(
            calculate_total_delivery_fee(dec!(10), -3.0, None, &NoAutoFee),
            Err(FeeError::InvalidAmount(_))
        ));
    }
}
