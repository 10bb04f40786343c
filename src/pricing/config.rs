//! Pricing configuration

use super::grid::MAX_PRECISION;
use crate::error::BotError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ranges for randomized quantities and price offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Lowest quantity drawn
    #[serde(default = "default_quantity_floor")]
    pub quantity_floor: Decimal,

    /// Highest quantity drawn
    #[serde(default = "default_quantity_ceiling")]
    pub quantity_ceiling: Decimal,

    /// Decimal places kept on quantities
    #[serde(default = "default_precision")]
    pub quantity_precision: u32,

    /// Smallest distance from the reference price
    #[serde(default = "default_offset_floor")]
    pub offset_floor: Decimal,

    /// Largest distance from the reference price
    #[serde(default = "default_offset_ceiling")]
    pub offset_ceiling: Decimal,

    /// Decimal places kept on offsets
    #[serde(default = "default_precision")]
    pub offset_precision: u32,
}

fn default_quantity_floor() -> Decimal {
    Decimal::ZERO
}
fn default_quantity_ceiling() -> Decimal {
    Decimal::TEN
}
fn default_offset_floor() -> Decimal {
    Decimal::ZERO
}
fn default_offset_ceiling() -> Decimal {
    Decimal::new(5, 0)
}
fn default_precision() -> u32 {
    1
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            quantity_floor: default_quantity_floor(),
            quantity_ceiling: default_quantity_ceiling(),
            quantity_precision: default_precision(),
            offset_floor: default_offset_floor(),
            offset_ceiling: default_offset_ceiling(),
            offset_precision: default_precision(),
        }
    }
}

impl PricingConfig {
    /// Reject negative or inverted ranges
    pub fn validate(&self) -> Result<(), BotError> {
        let ranges = [
            ("quantity", self.quantity_floor, self.quantity_ceiling, self.quantity_precision),
            ("offset", self.offset_floor, self.offset_ceiling, self.offset_precision),
        ];
        for (name, floor, ceiling, precision) in ranges {
            if floor < Decimal::ZERO {
                return Err(BotError::InvalidConfig(format!(
                    "{}_floor {} is negative",
                    name, floor
                )));
            }
            if floor > ceiling {
                return Err(BotError::InvalidConfig(format!(
                    "{}_floor {} above {}_ceiling {}",
                    name, floor, name, ceiling
                )));
            }
            if precision > MAX_PRECISION {
                return Err(BotError::InvalidConfig(format!(
                    "{}_precision {} exceeds {}",
                    name, precision, MAX_PRECISION
                )));
            }
        }
        if self.quantity_ceiling <= Decimal::ZERO {
            return Err(BotError::InvalidConfig(
                "quantity_ceiling must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.quantity_ceiling, dec!(10));
        assert_eq!(config.offset_ceiling, dec!(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PricingConfig = toml::from_str("offset_ceiling = 0.5\noffset_precision = 2").unwrap();
        assert_eq!(config.offset_ceiling, dec!(0.5));
        assert_eq!(config.offset_precision, 2);
        assert_eq!(config.quantity_ceiling, dec!(10));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let negative = PricingConfig {
            offset_floor: dec!(-1),
            ..PricingConfig::default()
        };
        assert!(negative.validate().is_err());

        let inverted = PricingConfig {
            quantity_floor: dec!(5),
            quantity_ceiling: dec!(1),
            ..PricingConfig::default()
        };
        assert!(inverted.validate().is_err());

        let zero_quantity = PricingConfig {
            quantity_ceiling: dec!(0),
            ..PricingConfig::default()
        };
        assert!(zero_quantity.validate().is_err());
    }
}
