//! Booking form fields and client-side validation.
//!
//! Validation here is local and resolves without network access; errors are
//! keyed per field so the UI can surface and clear them as the user edits.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{PricingInputs, Totals};

use super::ProductType;

/// Field-keyed validation errors, for both local checks and mapped server
/// responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The fields a booking form collects besides the pricing inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingForm {
    /// Travel date for single-day products.
    pub travel_date: Option<NaiveDate>,

    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,

    /// Pickup or meeting point, required for open trips and car rentals.
    pub pickup_point: Option<String>,

    /// Free-text note passed through to the order.
    pub notes: Option<String>,
}

/// Form fields the order service may report errors against. Server errors
/// for anything else are folded into one general message.
pub const KNOWN_FIELDS: &[&str] = &[
    "travel_date",
    "date_range",
    "unit_count",
    "contact_name",
    "contact_email",
    "contact_phone",
    "pickup_point",
    "discount_code",
    "addons",
];

/// Whether the order service field name corresponds to a UI field.
pub fn is_known_field(name: &str) -> bool {
    KNOWN_FIELDS.contains(&name)
}

impl BookingForm {
    /// Runs the required-field matrix for the product type plus the
    /// zero-price data check.
    pub fn validate(
        &self,
        product_type: ProductType,
        inputs: &PricingInputs,
        totals: &Totals,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if product_type.requires_date_range() {
            if inputs.date_range.is_none() {
                errors.insert("date_range", "Select a start and end date.");
            }
        } else if self.travel_date.is_none() {
            errors.insert("travel_date", "Select a travel date.");
        }

        if inputs.unit_count < 1 {
            errors.insert("unit_count", "At least one participant is required.");
        }

        if self.contact_name.trim().is_empty() {
            errors.insert("contact_name", "Name is required.");
        }
        if self.contact_email.trim().is_empty() {
            errors.insert("contact_email", "Email is required.");
        } else if !self.contact_email.contains('@') {
            errors.insert("contact_email", "Enter a valid email address.");
        }
        if self.contact_phone.trim().is_empty() {
            errors.insert("contact_phone", "Phone number is required.");
        }

        if product_type.requires_pickup_point()
            && self
                .pickup_point
                .as_deref()
                .map_or(true, |p| p.trim().is_empty())
        {
            errors.insert("pickup_point", "A pickup or meeting point is required.");
        }

        // A booking that prices to nothing is bad product data, not a free
        // booking.
        if totals.subtotal + totals.addon_total <= Decimal::ZERO {
            errors.insert(
                "unit_count",
                "This booking has no computable price. Please try again later.",
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::DateRange;

    fn valid_form() -> BookingForm {
        BookingForm {
            travel_date: NaiveDate::from_ymd_opt(2026, 9, 12),
            contact_name: "Ayu Lestari".into(),
            contact_email: "ayu@example.com".into(),
            contact_phone: "+62 812 0000 1111".into(),
            pickup_point: Some("Hotel lobby".into()),
            notes: None,
        }
    }

    fn priced_totals() -> Totals {
        Totals::compute(Decimal::from(500_000u32), 2, Decimal::ZERO, Decimal::ZERO)
    }

    #[test]
    fn valid_activity_form_passes() {
        let errors = valid_form().validate(
            ProductType::Activity,
            &PricingInputs::new(),
            &priced_totals(),
        );
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn missing_contact_fields_are_reported_per_field() {
        let form = BookingForm::default();
        let errors = form.validate(ProductType::Activity, &PricingInputs::new(), &priced_totals());

        assert!(errors.get("travel_date").is_some());
        assert!(errors.get("contact_name").is_some());
        assert!(errors.get("contact_email").is_some());
        assert!(errors.get("contact_phone").is_some());
    }

    #[test]
    fn email_must_look_like_an_email() {
        let mut form = valid_form();
        form.contact_email = "not-an-email".into();
        let errors = form.validate(ProductType::Activity, &PricingInputs::new(), &priced_totals());
        assert_eq!(errors.get("contact_email"), Some("Enter a valid email address."));
    }

    #[test]
    fn open_trip_requires_pickup_point() {
        let mut form = valid_form();
        form.pickup_point = None;
        let errors = form.validate(ProductType::OpenTrip, &PricingInputs::new(), &priced_totals());
        assert!(errors.get("pickup_point").is_some());
    }

    #[test]
    fn car_rental_requires_date_range_instead_of_travel_date() {
        let mut form = valid_form();
        form.travel_date = None;

        let mut inputs = PricingInputs::new();
        let errors = form.validate(ProductType::CarRental, &inputs, &priced_totals());
        assert!(errors.get("date_range").is_some());
        assert!(errors.get("travel_date").is_none());

        inputs.date_range = Some(
            DateRange::try_new(
                NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            )
            .unwrap(),
        );
        let errors = form.validate(ProductType::CarRental, &inputs, &priced_totals());
        assert!(errors.get("date_range").is_none());
    }

    #[test]
    fn zero_priced_booking_is_a_data_error() {
        let zero = Totals::compute(Decimal::ZERO, 1, Decimal::ZERO, Decimal::ZERO);
        let errors = valid_form().validate(ProductType::Activity, &PricingInputs::new(), &zero);
        assert!(!errors.is_empty());
    }

    #[test]
    fn known_field_matrix() {
        assert!(is_known_field("contact_email"));
        assert!(is_known_field("discount_code"));
        assert!(!is_known_field("payment_card"));
    }
}
