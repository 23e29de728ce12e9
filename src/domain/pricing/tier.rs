//! Price tiers and per-unit price resolution.
//!
//! A tier table maps a participant-count range to a per-unit price. Products
//! either carry a tier table or a single flat price; both are immutable for
//! the lifetime of a booking session.
//!
//! # Resolution policy
//!
//! - The first tier (ascending by `min_pax`) whose range contains the unit
//!   count wins.
//! - A count above every tier's bound resolves to the tier with the highest
//!   `min_pax`, treated as open-ended.
//! - A count below every tier's minimum resolves to the lowest tier's price
//!   so the product stays bookable. This mirrors the storefront's observed
//!   behavior and is logged at `warn` because it can price a booking at a
//!   group size the table never intended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A per-unit price applicable to a participant-count range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Smallest unit count this tier applies to (inclusive, >= 1).
    pub min_pax: u32,

    /// Largest unit count this tier applies to (inclusive). `None` means the
    /// tier is open-ended.
    pub max_pax: Option<u32>,

    /// Per-unit price within this range.
    pub price: Decimal,
}

impl PriceTier {
    /// Whether this tier's range contains the given unit count.
    pub fn matches(&self, unit_count: u32) -> bool {
        unit_count >= self.min_pax && self.max_pax.map_or(true, |max| unit_count <= max)
    }
}

/// An immutable, ordered set of price tiers.
///
/// Constructed once when the product detail loads and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceTier>", into = "Vec<PriceTier>")]
pub struct TierTable {
    tiers: Vec<PriceTier>,
}

impl TierTable {
    /// Builds a tier table from tiers in any order.
    ///
    /// Sorts ascending by `min_pax` defensively (catalog payloads are not
    /// guaranteed sorted) and validates each tier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the table is empty, a tier has
    /// `min_pax == 0`, a negative price, or `max_pax < min_pax`.
    pub fn try_new(mut tiers: Vec<PriceTier>) -> Result<Self, ValidationError> {
        if tiers.is_empty() {
            return Err(ValidationError::empty_field("tiers"));
        }

        for tier in &tiers {
            if tier.min_pax == 0 {
                return Err(ValidationError::below_minimum("tier.min_pax", 1, 0));
            }
            if tier.price < Decimal::ZERO {
                return Err(ValidationError::invalid_range(
                    "tier.price",
                    "price cannot be negative",
                ));
            }
            if let Some(max) = tier.max_pax {
                if max < tier.min_pax {
                    return Err(ValidationError::invalid_range(
                        "tier.max_pax",
                        format!("max_pax {} is below min_pax {}", max, tier.min_pax),
                    ));
                }
            }
        }

        tiers.sort_by_key(|t| t.min_pax);
        Ok(Self { tiers })
    }

    /// The tiers, ascending by `min_pax`.
    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Resolves the per-unit price for the given unit count.
    pub fn resolve(&self, unit_count: u32) -> Decimal {
        if let Some(tier) = self.tiers.iter().find(|t| t.matches(unit_count)) {
            return tier.price;
        }

        // Above every bound: the highest tier is treated as open-ended.
        let highest = self
            .tiers
            .last()
            .filter(|t| unit_count >= t.min_pax);
        if let Some(tier) = highest {
            return tier.price;
        }

        // Below every minimum: the lowest tier's price keeps the product
        // bookable even though the count is outside the table.
        let fallback = self.tiers[0].price;
        tracing::warn!(
            unit_count,
            table_min = self.tiers[0].min_pax,
            %fallback,
            "unit count below every tier minimum, falling back to the lowest tier price"
        );
        fallback
    }
}

impl TryFrom<Vec<PriceTier>> for TierTable {
    type Error = ValidationError;

    fn try_from(tiers: Vec<PriceTier>) -> Result<Self, Self::Error> {
        Self::try_new(tiers)
    }
}

impl From<TierTable> for Vec<PriceTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tier(min: u32, max: Option<u32>, price: u64) -> PriceTier {
        PriceTier {
            min_pax: min,
            max_pax: max,
            price: Decimal::from(price),
        }
    }

    fn sample_table() -> TierTable {
        TierTable::try_new(vec![tier(1, Some(3), 100), tier(4, None, 80)]).unwrap()
    }

    #[test]
    fn resolves_matching_tier() {
        let table = sample_table();
        assert_eq!(table.resolve(1), Decimal::from(100u32));
        assert_eq!(table.resolve(3), Decimal::from(100u32));
        assert_eq!(table.resolve(4), Decimal::from(80u32));
    }

    #[test]
    fn open_ended_tier_covers_large_counts() {
        let table = sample_table();
        assert_eq!(table.resolve(10), Decimal::from(80u32));
        assert_eq!(table.resolve(1000), Decimal::from(80u32));
    }

    #[test]
    fn count_above_bounded_table_falls_back_to_highest_tier() {
        let table =
            TierTable::try_new(vec![tier(1, Some(3), 100), tier(4, Some(6), 80)]).unwrap();
        assert_eq!(table.resolve(9), Decimal::from(80u32));
    }

    #[test]
    fn count_below_every_minimum_falls_back_to_the_lowest_tier() {
        let table =
            TierTable::try_new(vec![tier(2, Some(4), 120), tier(5, None, 90)]).unwrap();
        assert_eq!(table.resolve(1), Decimal::from(120u32));
    }

    #[test]
    fn zero_count_on_a_table_starting_at_one_uses_the_first_tier() {
        let table = TierTable::try_new(vec![tier(1, Some(3), 100), tier(4, None, 80)]).unwrap();
        assert_eq!(table.resolve(0), Decimal::from(100u32));
    }

    #[test]
    fn unsorted_input_is_sorted_on_construction() {
        let table =
            TierTable::try_new(vec![tier(5, None, 400_000), tier(1, Some(4), 500_000)]).unwrap();
        assert_eq!(table.tiers()[0].min_pax, 1);
        assert_eq!(table.resolve(3), Decimal::from(500_000u32));
        assert_eq!(table.resolve(6), Decimal::from(400_000u32));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(TierTable::try_new(vec![]).is_err());
    }

    #[test]
    fn rejects_zero_min_pax() {
        assert!(TierTable::try_new(vec![tier(0, Some(3), 100)]).is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(TierTable::try_new(vec![tier(4, Some(2), 100)]).is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let bad = PriceTier {
            min_pax: 1,
            max_pax: None,
            price: Decimal::from(-1i64),
        };
        assert!(TierTable::try_new(vec![bad]).is_err());
    }

    /// Generates non-overlapping tables sorted ascending by `min_pax`: each
    /// tier spans a contiguous block and the last tier is open-ended.
    fn contiguous_table() -> impl Strategy<Value = TierTable> {
        proptest::collection::vec((1u32..5, 1u64..1_000_000), 1..5)
            .prop_map(|spans| {
                let mut tiers = Vec::new();
                let mut start = 1u32;
                let last = spans.len() - 1;
                for (i, (width, price)) in spans.into_iter().enumerate() {
                    let max = if i == last {
                        None
                    } else {
                        Some(start + width - 1)
                    };
                    tiers.push(PriceTier {
                        min_pax: start,
                        max_pax: max,
                        price: Decimal::from(price),
                    });
                    start += width;
                }
                TierTable::try_new(tiers).unwrap()
            })
    }

    proptest! {
        /// For contiguous tables starting at 1, every count has exactly one
        /// matching tier, and resolution returns its price.
        #[test]
        fn resolution_returns_the_unique_matching_tier(
            table in contiguous_table(),
            unit_count in 1u32..50,
        ) {
            let matching: Vec<_> = table
                .tiers()
                .iter()
                .filter(|t| t.matches(unit_count))
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(table.resolve(unit_count), matching[0].price);
        }

        /// Resolution always yields a price present in the table, whatever
        /// the count.
        #[test]
        fn resolution_never_invents_a_price(
            table in contiguous_table(),
            unit_count in 0u32..100,
        ) {
            let price = table.resolve(unit_count);
            prop_assert!(table.tiers().iter().any(|t| t.price == price));
        }
    }
}
