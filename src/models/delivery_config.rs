use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FeeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    Auto,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTier {
    /// Inclusive upper bound in meters.
    pub max_distance: f64,
    pub fee: Decimal,
}

/// Per-shop delivery pricing, edited by the merchant and read at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLogicConfig {
    pub shop_id: Uuid,
    pub minimum_order_value: Decimal,
    pub small_order_surcharge: Decimal,
    pub least_order_value: Decimal,
    pub distance_mode: DistanceMode,
    pub distance_tiers: Vec<DistanceTier>,
    pub max_delivery_fee: Option<Decimal>,
    pub beyond_tier_fee_per_unit: Decimal,
    /// Meters per charged unit past the last tier.
    pub beyond_tier_distance_unit: f64,
    pub free_delivery_threshold: Option<Decimal>,
    /// Meters.
    pub free_delivery_radius: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl DeliveryLogicConfig {
    pub fn validate(&self) -> Result<(), FeeError> {
        let amounts = [
            ("minimum_order_value", Some(self.minimum_order_value)),
            ("small_order_surcharge", Some(self.small_order_surcharge)),
            ("least_order_value", Some(self.least_order_value)),
            ("max_delivery_fee", self.max_delivery_fee),
            ("beyond_tier_fee_per_unit", Some(self.beyond_tier_fee_per_unit)),
            ("free_delivery_threshold", self.free_delivery_threshold),
        ];
        for (field, amount) in amounts {
            if let Some(amount) = amount {
                if amount.is_sign_negative() && !amount.is_zero() {
                    return Err(FeeError::InvalidAmount(format!(
                        "{field} must be non-negative, got {amount}"
                    )));
                }
            }
        }

        if self.distance_mode == DistanceMode::Custom && self.distance_tiers.is_empty() {
            return Err(FeeError::InvalidTierConfig(
                "custom distance mode requires at least one tier".to_string(),
            ));
        }

        let mut previous: Option<f64> = None;
        for (index, tier) in self.distance_tiers.iter().enumerate() {
            if !tier.max_distance.is_finite() || tier.max_distance < 0.0 {
                return Err(FeeError::InvalidTierConfig(format!(
                    "tier {index} max_distance must be a finite non-negative number, got {}",
                    tier.max_distance
                )));
            }

            if tier.fee.is_sign_negative() && !tier.fee.is_zero() {
                return Err(FeeError::InvalidAmount(format!(
                    "tier {index} fee must be non-negative, got {}",
                    tier.fee
                )));
            }

            if let Some(previous) = previous {
                if tier.max_distance <= previous {
                    return Err(FeeError::InvalidTierConfig(format!(
                        "tiers must be strictly ascending: tier {index} max_distance {} <= {previous}",
                        tier.max_distance
                    )));
                }
            }
            previous = Some(tier.max_distance);
        }

        let unit = self.beyond_tier_distance_unit;
        if !unit.is_finite() || unit < 0.0 {
            return Err(FeeError::InvalidTierConfig(format!(
                "beyond_tier_distance_unit must be a finite non-negative number, got {unit}"
            )));
        }
        if unit == 0.0 && !self.beyond_tier_fee_per_unit.is_zero() {
            return Err(FeeError::InvalidTierConfig(
                "beyond_tier_distance_unit must be > 0 when a per-unit fee is charged".to_string(),
            ));
        }

        if let Some(radius) = self.free_delivery_radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(FeeError::InvalidTierConfig(format!(
                    "free_delivery_radius must be a finite non-negative number, got {radius}"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigEvent {
    Updated { config: DeliveryLogicConfig },
    Removed { shop_id: Uuid, at: DateTime<Utc> },
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::{DeliveryLogicConfig, DistanceMode, DistanceTier};
    use crate::error::FeeError;

    fn config(tiers: &[(f64, rust_decimal::Decimal)]) -> DeliveryLogicConfig {
        DeliveryLogicConfig {
            shop_id: Uuid::from_u128(1),
            minimum_order_value: dec!(15),
            small_order_surcharge: dec!(2.50),
            least_order_value: dec!(5),
            distance_mode: DistanceMode::Custom,
            distance_tiers: tiers
                .iter()
                .map(|(max_distance, fee)| DistanceTier {
                    max_distance: *max_distance,
                    fee: *fee,
                })
                .collect(),
            max_delivery_fee: Some(dec!(60)),
            beyond_tier_fee_per_unit: dec!(5),
            beyond_tier_distance_unit: 100.0,
            free_delivery_threshold: None,
            free_delivery_radius: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn ascending_tiers_are_accepted() {
        let cfg = config(&[(200.0, dec!(20)), (400.0, dec!(30))]);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn equal_max_distances_are_rejected() {
        let cfg = config(&[(200.0, dec!(20)), (200.0, dec!(30))]);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidTierConfig(_))));
    }

    #[test]
    fn descending_tiers_are_rejected() {
        let cfg = config(&[(400.0, dec!(30)), (200.0, dec!(20))]);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidTierConfig(_))));
    }

    #[test]
    fn custom_mode_without_tiers_is_rejected() {
        let cfg = config(&[]);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidTierConfig(_))));
    }

    #[test]
    fn auto_mode_without_tiers_is_accepted() {
        let mut cfg = config(&[]);
        cfg.distance_mode = DistanceMode::Auto;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn nan_tier_distance_is_rejected() {
        let cfg = config(&[(f64::NAN, dec!(20))]);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidTierConfig(_))));
    }

    #[test]
    fn zero_unit_with_per_unit_fee_is_rejected() {
        let mut cfg = config(&[(200.0, dec!(20))]);
        cfg.beyond_tier_distance_unit = 0.0;
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidTierConfig(_))));

        cfg.beyond_tier_fee_per_unit = dec!(0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn negative_money_is_rejected() {
        let mut cfg = config(&[(200.0, dec!(20))]);
        cfg.small_order_surcharge = dec!(-1);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidAmount(_))));

        let cfg = config(&[(200.0, dec!(-20))]);
        assert!(matches!(cfg.validate(), Err(FeeError::InvalidAmount(_))));
    }
}
