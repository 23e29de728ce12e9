//! Adapters: concrete implementations of the ports plus the HTTP surface.

pub mod discount;
pub mod http;
pub mod orders;
