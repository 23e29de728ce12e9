//! Discount authority adapters: remote HTTP client and test mock.

mod mock;
mod remote;

pub use mock::MockDiscountValidator;
pub use remote::{DiscountServiceConfig, RemoteDiscountValidator};
