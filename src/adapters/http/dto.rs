//! HTTP DTOs (Data Transfer Objects) for the booking engine endpoints.
//!
//! These types define the JSON request/response structure of the engine
//! boundary. They keep the wire format separate from the domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::{FieldErrors, Product};
use crate::domain::discount::{DiscountState, DiscountStatus};
use crate::domain::pricing::Totals;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open a booking session for a loaded product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// The product as supplied by the catalog: identity, pricing shape,
    /// addon catalog.
    pub product: Product,
}

/// Request to mutate pricing inputs. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInputsRequest {
    /// New unit count (participants, days, tickets).
    pub unit_count: Option<u32>,

    /// Addon name to toggle on or off.
    pub toggle_addon: Option<String>,

    /// New date range for duration-priced products.
    pub date_range: Option<DateRangeDto>,

    /// Product-specific extension fields to set.
    #[serde(default)]
    pub extensions: std::collections::BTreeMap<String, String>,
}

/// Inclusive date range on the wire.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DateRangeDto {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Request to store and validate a discount code.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyDiscountRequest {
    pub code: String,
}

/// Request to submit the booking.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBookingRequest {
    pub travel_date: Option<chrono::NaiveDate>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(default)]
    pub pickup_point: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Displayed totals for a booking.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    pub subtotal: Decimal,
    pub addon_total: Decimal,
    pub grand_total: Decimal,
}

impl From<Totals> for TotalsResponse {
    fn from(totals: Totals) -> Self {
        Self {
            subtotal: totals.subtotal,
            addon_total: totals.addon_total,
            grand_total: totals.grand_total,
        }
    }
}

/// Discount portion of the booking state.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountStateResponse {
    pub code: String,
    pub status: DiscountStatus,
    pub confirmed_amount: Decimal,
    pub message: Option<String>,
}

impl From<DiscountState> for DiscountStateResponse {
    fn from(state: DiscountState) -> Self {
        Self {
            code: state.code().to_string(),
            status: state.status(),
            confirmed_amount: state.confirmed_amount(),
            message: state.message().map(String::from),
        }
    }
}

/// Full booking state: totals plus discount.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStateResponse {
    pub booking_id: String,
    pub totals: TotalsResponse,
    pub discount: DiscountStateResponse,
}

/// Response for a created order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: String,
}

/// Error response with an optional per-field breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn general(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }

    pub fn with_fields(error: impl Into<String>, fields: FieldErrors) -> Self {
        Self {
            error: error.into(),
            fields: Some(fields),
        }
    }
}
