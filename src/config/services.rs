//! Remote service configuration (discount authority, order service)

use serde::Deserialize;

use super::error::ValidationError;

/// Endpoints and credentials for the two remote collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the discount-validation service
    pub discount_base_url: String,

    /// Bearer token for the discount service (optional)
    #[serde(default)]
    pub discount_api_token: Option<String>,

    /// Discount request timeout in seconds
    #[serde(default = "default_discount_timeout")]
    pub discount_timeout_secs: u64,

    /// Base URL of the order-creation service
    pub order_base_url: String,

    /// Bearer token for the order service (optional)
    #[serde(default)]
    pub order_api_token: Option<String>,

    /// Order request timeout in seconds
    #[serde(default = "default_order_timeout")]
    pub order_timeout_secs: u64,
}

impl ServicesConfig {
    /// Validate service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.discount_base_url.is_empty() {
            return Err(ValidationError::MissingRequired(
                "SERVICES_DISCOUNT_BASE_URL",
            ));
        }
        if !is_http_url(&self.discount_base_url) {
            return Err(ValidationError::InvalidServiceUrl("discount_base_url"));
        }
        if self.order_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("SERVICES_ORDER_BASE_URL"));
        }
        if !is_http_url(&self.order_base_url) {
            return Err(ValidationError::InvalidServiceUrl("order_base_url"));
        }
        if self.discount_timeout_secs == 0 || self.order_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_discount_timeout() -> u64 {
    10
}

fn default_order_timeout() -> u64 {
    15
}
