//! Order creation port.
//!
//! Contract with the remote order service. The engine's responsibility ends
//! at handing back the created order identifier; payment capture and
//! fulfillment live elsewhere.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::booking::ProductType;
use crate::domain::foundation::ProductId;
use crate::domain::pricing::DateRange;

/// The full booking payload sent at order-creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub product_type: ProductType,
    pub product_id: ProductId,
    pub unit_count: u32,
    pub selected_addons: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Product-specific extension fields, passed through as-is.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,

    /// Present only when the discount was confirmed at submit time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,

    /// The grand total the customer saw when submitting.
    pub grand_total: Decimal,
}

/// The order service's acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    /// The created order identifier.
    pub id: String,
}

/// Failures from the order service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderServiceError {
    /// 422-style response: the service rejected specific fields.
    #[error("order rejected: {} field error(s)", .errors.len())]
    Validation { errors: BTreeMap<String, String> },

    /// No response within the deadline.
    #[error("order service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection-level failure.
    #[error("order service unreachable: {reason}")]
    Transport { reason: String },

    /// Any other non-success response (auth, server error, ...).
    #[error("order service error (status {status}): {message}")]
    Service { status: u16, message: String },
}

impl OrderServiceError {
    pub fn transport(reason: impl Into<String>) -> Self {
        OrderServiceError::Transport {
            reason: reason.into(),
        }
    }
}

/// Port for the remote order service.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Creates an order from the draft.
    async fn create_order(&self, draft: OrderDraft) -> Result<CreatedOrder, OrderServiceError>;
}
