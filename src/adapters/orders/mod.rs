//! Order service adapters: remote HTTP client and test mock.

mod mock;
mod remote;

pub use mock::MockOrderGateway;
pub use remote::{OrderServiceConfig, RemoteOrderGateway};
