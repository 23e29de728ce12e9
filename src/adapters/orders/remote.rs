//! Remote order service adapter.
//!
//! Implements the `OrderGateway` trait against the storefront's
//! order-creation HTTP endpoint. A created order comes back as
//! `201 {"order": {"id": ...}}`; field validation failures come back as
//! `422 {"errors": {"field": "message"}}`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{CreatedOrder, OrderDraft, OrderGateway, OrderServiceError};

/// Order service configuration.
#[derive(Clone)]
pub struct OrderServiceConfig {
    base_url: String,
    api_token: Option<SecretString>,
    timeout: Duration,
}

impl OrderServiceConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(15),
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

/// Response envelope for a created order.
#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: CreatedOrder,
}

/// Response body of a 422-style rejection.
#[derive(Debug, Deserialize)]
struct ValidationEnvelope {
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// `OrderGateway` backed by the remote HTTP service.
pub struct RemoteOrderGateway {
    config: OrderServiceConfig,
    client: reqwest::Client,
}

impl RemoteOrderGateway {
    pub fn new(config: OrderServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl OrderGateway for RemoteOrderGateway {
    async fn create_order(&self, draft: OrderDraft) -> Result<CreatedOrder, OrderServiceError> {
        let mut builder = self.client.post(self.orders_url()).json(&draft);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OrderServiceError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else {
                OrderServiceError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let envelope = response
                .json::<OrderEnvelope>()
                .await
                .map_err(|e| OrderServiceError::Service {
                    status: status.as_u16(),
                    message: format!("unreadable order response: {}", e),
                })?;
            return Ok(envelope.order);
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 422 {
            let envelope: ValidationEnvelope = serde_json::from_str(&body).unwrap_or_else(|_| {
                ValidationEnvelope {
                    errors: BTreeMap::new(),
                }
            });
            return Err(OrderServiceError::Validation {
                errors: envelope.errors,
            });
        }

        tracing::error!(status = status.as_u16(), "order service returned an error");
        Err(OrderServiceError::Service {
            status: status.as_u16(),
            message: body,
        })
    }
}
