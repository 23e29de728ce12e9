//! Addons: optional, separately priced extras attached to a booking.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A named, priced extra (photographer, insurance, child seat, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Name, unique within a product.
    pub name: String,

    /// Price per booking (not per unit).
    pub price: Decimal,
}

/// The addon catalog supplied with the product, immutable per session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Addon>", into = "Vec<Addon>")]
pub struct AddonCatalog {
    addons: Vec<Addon>,
}

impl AddonCatalog {
    /// Builds a catalog, rejecting duplicate names and negative prices.
    pub fn try_new(addons: Vec<Addon>) -> Result<Self, ValidationError> {
        {
            let mut seen = BTreeSet::new();
            for addon in &addons {
                if addon.name.trim().is_empty() {
                    return Err(ValidationError::empty_field("addon.name"));
                }
                if addon.price < Decimal::ZERO {
                    return Err(ValidationError::invalid_range(
                        "addon.price",
                        "price cannot be negative",
                    ));
                }
                if !seen.insert(addon.name.as_str()) {
                    return Err(ValidationError::invalid_format(
                        "addon.name",
                        format!("duplicate addon '{}'", addon.name),
                    ));
                }
            }
        }
        Ok(Self { addons })
    }

    /// Looks up an addon by name.
    pub fn get(&self, name: &str) -> Option<&Addon> {
        self.addons.iter().find(|a| a.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }
}

impl TryFrom<Vec<Addon>> for AddonCatalog {
    type Error = ValidationError;

    fn try_from(addons: Vec<Addon>) -> Result<Self, Self::Error> {
        Self::try_new(addons)
    }
}

impl From<AddonCatalog> for Vec<Addon> {
    fn from(catalog: AddonCatalog) -> Self {
        catalog.addons
    }
}

/// The set of addon names the user has selected.
///
/// Owned and mutated only by the toggle action; cleared when the booking
/// form resets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedAddons {
    names: BTreeSet<String>,
}

impl SelectedAddons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles an addon: selects it if absent, deselects it if present.
    /// Returns whether the addon is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Iterates the selected names in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Sums the prices of selected addons present in the catalog.
    ///
    /// Names no longer in the catalog (removed after being selected)
    /// contribute zero and are pruned from the selection rather than
    /// treated as an error.
    pub fn total(&mut self, catalog: &AddonCatalog) -> Decimal {
        self.names.retain(|name| catalog.get(name).is_some());
        self.names
            .iter()
            .filter_map(|name| catalog.get(name))
            .map(|addon| addon.price)
            .sum()
    }
}
