//! Remote discount authority adapter.
//!
//! Implements the `DiscountValidator` trait against the storefront's
//! discount-validation HTTP service. The service is an oracle: it receives
//! the code plus the full pricing inputs and answers with an absolute
//! discount amount.
//!
//! # Configuration
//!
//! ```ignore
//! let config = DiscountServiceConfig::new("https://discounts.internal")
//!     .with_token("svc_token")
//!     .with_timeout(Duration::from_secs(10));
//! let validator = RemoteDiscountValidator::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{DiscountCheck, DiscountCheckRequest, DiscountServiceError, DiscountValidator};

/// Discount service configuration.
#[derive(Clone)]
pub struct DiscountServiceConfig {
    /// Base URL of the discount service.
    base_url: String,

    /// Optional bearer token for service-to-service auth.
    api_token: Option<SecretString>,

    /// Request timeout.
    timeout: Duration,
}

impl DiscountServiceConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the service bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `DiscountValidator` backed by the remote HTTP service.
pub struct RemoteDiscountValidator {
    config: DiscountServiceConfig,
    client: reqwest::Client,
}

impl RemoteDiscountValidator {
    pub fn new(config: DiscountServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    fn validate_url(&self) -> String {
        format!(
            "{}/v1/discounts/validate",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl DiscountValidator for RemoteDiscountValidator {
    async fn validate(
        &self,
        request: DiscountCheckRequest,
    ) -> Result<DiscountCheck, DiscountServiceError> {
        let mut builder = self.client.post(self.validate_url()).json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                DiscountServiceError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else {
                DiscountServiceError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<DiscountCheck>()
                .await
                .map_err(|e| DiscountServiceError::protocol(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            // The authority rejected the code; its payload carries the
            // user-facing reason.
            Err(DiscountServiceError::invalid(
                parse_error_message(&body)
                    .unwrap_or_else(|| "This discount code cannot be used.".to_string()),
            ))
        } else {
            tracing::error!(status = status.as_u16(), "discount service returned server error");
            Err(DiscountServiceError::protocol(format!(
                "status {}",
                status.as_u16()
            )))
        }
    }
}

/// Pulls a human-readable message out of an error payload, accepting the
/// two shapes the service emits: `{"message": ...}` and
/// `{"error": {"message": ...}}`.
fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .map(String::from)
}
