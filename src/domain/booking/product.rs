//! Product data supplied once when the product detail loads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProductId;
use crate::domain::pricing::{AddonCatalog, TierTable};

/// The four storefront product lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Activity,
    HolidayPackage,
    OpenTrip,
    CarRental,
}

impl ProductType {
    /// Whether bookings of this type need a pickup or meeting point.
    pub fn requires_pickup_point(&self) -> bool {
        matches!(self, ProductType::OpenTrip | ProductType::CarRental)
    }

    /// Whether bookings of this type are priced over a date range.
    pub fn requires_date_range(&self) -> bool {
        matches!(self, ProductType::CarRental | ProductType::HolidayPackage)
    }

    /// Stable identifier used on the wire toward the discount authority and
    /// the order service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Activity => "activity",
            ProductType::HolidayPackage => "holiday_package",
            ProductType::OpenTrip => "open_trip",
            ProductType::CarRental => "car_rental",
        }
    }
}

/// How a product is priced: one flat per-unit price, or a tier table over
/// the unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPricing {
    Flat(Decimal),
    Tiered(TierTable),
}

impl ProductPricing {
    /// Resolves the per-unit price for a unit count.
    ///
    /// A flat price is returned unchanged; a tier table goes through the
    /// resolution policy in [`TierTable::resolve`].
    pub fn unit_price(&self, unit_count: u32) -> Decimal {
        match self {
            ProductPricing::Flat(price) => *price,
            ProductPricing::Tiered(table) => table.resolve(unit_count),
        }
    }
}

/// A bookable product: identity, pricing shape, and addon catalog.
///
/// Immutable for the lifetime of a booking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub product_type: ProductType,
    pub name: String,
    pub pricing: ProductPricing,
    #[serde(default)]
    pub addons: AddonCatalog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::PriceTier;

    #[test]
    fn flat_price_ignores_unit_count() {
        let pricing = ProductPricing::Flat(Decimal::from(350_000u32));
        assert_eq!(pricing.unit_price(1), Decimal::from(350_000u32));
        assert_eq!(pricing.unit_price(40), Decimal::from(350_000u32));
    }

    #[test]
    fn tiered_price_follows_the_table() {
        let table = TierTable::try_new(vec![
            PriceTier {
                min_pax: 1,
                max_pax: Some(4),
                price: Decimal::from(500_000u32),
            },
            PriceTier {
                min_pax: 5,
                max_pax: None,
                price: Decimal::from(400_000u32),
            },
        ])
        .unwrap();
        let pricing = ProductPricing::Tiered(table);
        assert_eq!(pricing.unit_price(3), Decimal::from(500_000u32));
        assert_eq!(pricing.unit_price(6), Decimal::from(400_000u32));
    }

    #[test]
    fn pickup_point_matrix() {
        assert!(ProductType::OpenTrip.requires_pickup_point());
        assert!(ProductType::CarRental.requires_pickup_point());
        assert!(!ProductType::Activity.requires_pickup_point());
        assert!(!ProductType::HolidayPackage.requires_pickup_point());
    }

    #[test]
    fn date_range_matrix() {
        assert!(ProductType::CarRental.requires_date_range());
        assert!(ProductType::HolidayPackage.requires_date_range());
        assert!(!ProductType::Activity.requires_date_range());
        assert!(!ProductType::OpenTrip.requires_date_range());
    }
}
