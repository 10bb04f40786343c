//! Side selection per tick

use crate::order::Side;
use serde::Serialize;

/// Below this draw a LONG fires
pub const LOWER_THRESHOLD: f64 = 1.0 / 3.0;
/// Above this draw a LONG also fires
pub const UPPER_THRESHOLD: f64 = 2.0 / 3.0;

/// Which sides to submit on a tick.
///
/// The two conditions overlap: LONG fires for `r < 1/3` or `r > 2/3`, SHORT
/// for `r > 1/3`. The result is one third LONG only, one third SHORT only,
/// one third both. This reproduces the production bot's behavior exactly and
/// has not been confirmed as intended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SidePlan {
    pub long: bool,
    pub short: bool,
}

impl SidePlan {
    /// Plan for a uniform draw `r` in `[0, 1)`
    pub fn from_draw(r: f64) -> Self {
        Self {
            long: r < LOWER_THRESHOLD || r > UPPER_THRESHOLD,
            short: r > LOWER_THRESHOLD,
        }
    }

    /// Selected sides, LONG before SHORT
    pub fn sides(self) -> impl Iterator<Item = Side> {
        [(self.long, Side::Long), (self.short, Side::Short)]
            .into_iter()
            .filter_map(|(selected, side)| selected.then_some(side))
    }

    /// Nothing fires
    pub fn is_empty(&self) -> bool {
        !self.long && !self.short
    }
}
