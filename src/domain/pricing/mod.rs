//! Pricing: tier tables, addons, pricing inputs, and derived totals.

mod addon;
mod inputs;
mod tier;
mod totals;

pub use addon::{Addon, AddonCatalog, SelectedAddons};
pub use inputs::{DateRange, PricingInputs};
pub use tier::{PriceTier, TierTable};
pub use totals::Totals;
