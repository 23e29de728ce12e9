//! Derived booking totals.
//!
//! Totals are pure functions of the pricing inputs and the confirmed
//! discount; they are recomputed on every read and never cached across a
//! pricing-input change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three displayed amounts for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// `unit_price * unit_count`.
    pub subtotal: Decimal,

    /// Sum of selected addon prices.
    pub addon_total: Decimal,

    /// `max(0, subtotal + addon_total - discount)`.
    pub grand_total: Decimal,
}

impl Totals {
    /// Combines resolved prices and the confirmed discount into the
    /// authoritative totals.
    pub fn compute(
        unit_price: Decimal,
        unit_count: u32,
        addon_total: Decimal,
        confirmed_discount: Decimal,
    ) -> Self {
        let subtotal = unit_price * Decimal::from(unit_count);
        let grand_total = (subtotal + addon_total - confirmed_discount).max(Decimal::ZERO);
        Self {
            subtotal,
            addon_total,
            grand_total,
        }
    }
}
