//! Uniform draws on a fixed-precision decimal grid

use crate::error::BotError;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest supported number of decimal places
pub const MAX_PRECISION: u32 = 8;

/// Every multiple of `10^-precision` within a closed range.
///
/// Sampling picks one grid point uniformly, which is the same distribution
/// as drawing a uniform value and truncating it to `precision` places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalGrid {
    lo_units: i64,
    hi_units: i64,
    precision: u32,
}

impl DecimalGrid {
    /// Grid covering `[floor, ceiling]` at `precision` decimal places
    pub fn new(floor: Decimal, ceiling: Decimal, precision: u32) -> Result<Self, BotError> {
        if precision > MAX_PRECISION {
            return Err(BotError::InvalidConfig(format!(
                "precision {} exceeds {}",
                precision, MAX_PRECISION
            )));
        }
        if floor > ceiling {
            return Err(BotError::InvalidConfig(format!(
                "range floor {} above ceiling {}",
                floor, ceiling
            )));
        }

        let step = Decimal::new(1, precision);
        let to_units = |value: Decimal| {
            value.to_i64().ok_or_else(|| {
                BotError::InvalidConfig(format!("range bound {} out of bounds", value))
            })
        };
        let in_steps = |value: Decimal| {
            value.checked_div(step).ok_or_else(|| {
                BotError::InvalidConfig(format!("range bound {} out of bounds", value))
            })
        };
        let lo_units = to_units(in_steps(floor)?.ceil())?;
        let hi_units = to_units(in_steps(ceiling)?.floor())?;

        Self::from_units(lo_units, hi_units, precision)
    }

    fn from_units(lo_units: i64, hi_units: i64, precision: u32) -> Result<Self, BotError> {
        if lo_units > hi_units {
            return Err(BotError::InvalidConfig(format!(
                "range holds no value at {} decimal places",
                precision
            )));
        }
        Ok(Self {
            lo_units,
            hi_units,
            precision,
        })
    }

    /// Same grid with zero and negatives removed
    pub fn excluding_zero(self) -> Result<Self, BotError> {
        Self::from_units(self.lo_units.max(1), self.hi_units, self.precision)
    }

    /// Draw one grid point uniformly
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Decimal {
        Decimal::new(rng.gen_range(self.lo_units..=self.hi_units), self.precision)
    }

    /// Smallest grid point
    pub fn min(&self) -> Decimal {
        Decimal::new(self.lo_units, self.precision)
    }

    /// Largest grid point
    pub fn max(&self) -> Decimal {
        Decimal::new(self.hi_units, self.precision)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }
}
