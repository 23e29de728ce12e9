//! Travelcart - Tiered Pricing & Discount Reconciliation Engine
//!
//! The pricing core of a multi-product travel-booking storefront: tier-table
//! price resolution, addon totals, asynchronously validated discount codes,
//! and order submission against a remote service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
