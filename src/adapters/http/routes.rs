//! Axum router configuration for the booking engine endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    apply_discount, close_booking, create_booking, get_booking, submit_booking, update_inputs,
    BookingAppState,
};

/// Create the booking API router.
///
/// # Routes
///
/// - `POST /bookings` - open a booking session for a product
/// - `GET /bookings/:id` - current totals and discount state
/// - `PATCH /bookings/:id/inputs` - mutate pricing inputs
/// - `POST /bookings/:id/discount` - store and validate a discount code
/// - `POST /bookings/:id/submit` - validate and create the order
/// - `DELETE /bookings/:id` - close the form and discard its state
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking).delete(close_booking))
        .route("/bookings/:id/inputs", patch(update_inputs))
        .route("/bookings/:id/discount", post(apply_discount))
        .route("/bookings/:id/submit", post(submit_booking))
}
