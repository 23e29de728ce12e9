//! Booking engine tuning

use serde::Deserialize;

use super::error::ValidationError;

/// Tuning knobs for the discount reconciliation protocol.
///
/// The storefront historically used ad hoc debounce timers with windows
/// between 500 and 800 ms; this is the single configurable replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Quiet period after the last pricing change before an applied
    /// discount is revalidated, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl BookingConfig {
    /// Validate booking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(100..=5000).contains(&self.debounce_ms) {
            return Err(ValidationError::InvalidDebounceWindow);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_sits_in_the_accepted_band() {
        let config = BookingConfig::default();
        assert!(config.validate().is_ok());
        assert!((500..=800).contains(&config.debounce_ms));
    }

    #[test]
    fn out_of_band_window_is_rejected() {
        let config = BookingConfig { debounce_ms: 50 };
        assert!(config.validate().is_err());

        let config = BookingConfig { debounce_ms: 60_000 };
        assert!(config.validate().is_err());
    }
}
