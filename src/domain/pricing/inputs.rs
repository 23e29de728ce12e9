//! Mutable pricing inputs for a booking-form session.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::SelectedAddons;

/// Inclusive date range for duration-priced products (car rentals, holiday
/// packages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::invalid_range(
                "date_range",
                format!("end {} is before start {}", end, start),
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of days covered, counting both endpoints (a same-day rental is
    /// one day).
    pub fn days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }
}

/// The mutable tuple driving pricing: unit count, addon selection, and
/// product-specific context.
///
/// Any mutation to this struct is a pricing-relevant change and must go
/// through the booking session so a previously applied discount gets
/// revalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Quantity driving tiered pricing (participants, days, tickets).
    pub unit_count: u32,

    /// Addon names selected by the user.
    pub selected_addons: SelectedAddons,

    /// Date range for duration-priced products.
    pub date_range: Option<DateRange>,

    /// Product-specific fields (nationality, pickup point, ...) carried as
    /// an open map instead of per-product structs.
    pub extensions: BTreeMap<String, String>,
}

impl PricingInputs {
    /// Fresh inputs for a newly opened booking form.
    pub fn new() -> Self {
        Self {
            unit_count: 1,
            selected_addons: SelectedAddons::new(),
            date_range: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Resets to the state of a newly opened form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PricingInputs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_range_is_one_day() {
        let range = DateRange::try_new(date(2026, 3, 10), date(2026, 3, 10)).unwrap();
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn range_counts_both_endpoints() {
        let range = DateRange::try_new(date(2026, 3, 10), date(2026, 3, 12)).unwrap();
        assert_eq!(range.days(), 3);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::try_new(date(2026, 3, 12), date(2026, 3, 10)).is_err());
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut inputs = PricingInputs::new();
        inputs.unit_count = 7;
        inputs.selected_addons.toggle("Photographer");
        inputs.extensions.insert("pickup_point".into(), "Hotel lobby".into());

        inputs.reset();

        assert_eq!(inputs.unit_count, 1);
        assert!(inputs.selected_addons.is_empty());
        assert!(inputs.extensions.is_empty());
        assert!(inputs.date_range.is_none());
    }
}
