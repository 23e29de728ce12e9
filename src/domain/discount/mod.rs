//! Discount code state machine.

mod state;

pub use state::{DiscountState, DiscountStatus};
