//! Order pricing module
//!
//! Turns a reference quote into a randomized limit price and quantity.
//! Bids are placed below the reference and asks above it, so the bot never
//! crosses the market against itself.

mod config;
mod grid;

pub use config::PricingConfig;
pub use grid::DecimalGrid;

use crate::error::BotError;
use crate::oracle::Quote;
use crate::order::Side;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

/// Price and quantity chosen for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricedOrder {
    /// Limit price
    pub price: Decimal,
    /// Order quantity
    pub quantity: Decimal,
    /// Distance from the reference price
    pub offset: Decimal,
}

/// Apply a price offset away from the reference on the passive side
pub fn apply_offset(side: Side, reference: Decimal, offset: Decimal) -> Result<Decimal, BotError> {
    if reference <= Decimal::ZERO {
        return Err(BotError::InvalidReferencePrice(reference));
    }

    let price = match side {
        Side::Long => reference.checked_sub(offset),
        Side::Short => reference.checked_add(offset),
    }
    .ok_or(BotError::InvalidReferencePrice(reference))?;

    // A reference below the offset band would put the bid at or under zero
    if price <= Decimal::ZERO {
        return Err(BotError::InvalidReferencePrice(reference));
    }

    Ok(price)
}

/// Draws randomized prices and quantities from configured ranges
#[derive(Debug, Clone)]
pub struct OrderPricer {
    quantity: DecimalGrid,
    offset: DecimalGrid,
}

impl OrderPricer {
    /// Create a pricer, validating the configured ranges
    pub fn new(config: &PricingConfig) -> Result<Self, BotError> {
        config.validate()?;

        let quantity = DecimalGrid::new(
            config.quantity_floor,
            config.quantity_ceiling,
            config.quantity_precision,
        )?
        .excluding_zero()?;
        let offset = DecimalGrid::new(
            config.offset_floor,
            config.offset_ceiling,
            config.offset_precision,
        )?;

        Ok(Self { quantity, offset })
    }

    /// Price one order on `side` against `quote`
    pub fn price<R: Rng + ?Sized>(
        &self,
        side: Side,
        quote: &Quote,
        rng: &mut R,
    ) -> Result<PricedOrder, BotError> {
        if quote.price <= Decimal::ZERO {
            return Err(BotError::InvalidReferencePrice(quote.price));
        }

        let quantity = self.quantity.sample(rng);
        let offset = self.offset.sample(rng);
        let price = apply_offset(side, quote.price, offset)?;

        Ok(PricedOrder {
            price,
            quantity,
            offset,
        })
    }

    pub fn quantity_grid(&self) -> &DecimalGrid {
        &self.quantity
    }

    pub fn offset_grid(&self) -> &DecimalGrid {
        &self.offset
    }
}
