//! HTTP boundary exposing the engine: reactive totals and discount state,
//! plus the imperative apply-code and submit actions.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::BookingAppState;
pub use routes::booking_routes;
