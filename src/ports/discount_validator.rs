//! Discount validation port.
//!
//! Defines the contract with the remote pricing authority that decides
//! whether a discount code applies to the current booking inputs and for how
//! much. The authority is an oracle: amounts come back absolute and are
//! never recomputed locally.
//!
//! A `discount_amount` of exactly zero is a valid, non-error response
//! ("code recognized, not applicable") and must stay distinguishable from a
//! transport or validation failure.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::booking::ProductType;
use crate::domain::foundation::ProductId;
use crate::domain::pricing::DateRange;

/// One validation request, carrying the full pricing-relevant input state.
///
/// The authority needs the inputs, not just the code: percentage-style codes
/// are computed server-side from the very subtotal these fields determine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCheckRequest {
    pub product_type: ProductType,
    pub product_id: ProductId,
    pub discount_code: String,
    pub unit_count: u32,
    pub selected_addons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// A successful response from the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCheck {
    /// Absolute discount amount; zero means "recognized, not applicable".
    pub discount_amount: Decimal,

    /// The authority's own view of the discounted total, for display.
    pub total_amount: Decimal,

    #[serde(default)]
    pub message: Option<String>,
}

/// Failures talking to the discount authority.
///
/// All of these are non-fatal to the booking flow: the session degrades to
/// "no discount applied" and surfaces `user_message()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountServiceError {
    /// The authority rejected the code (expired, unknown, not eligible).
    #[error("discount code rejected: {message}")]
    Invalid { message: String },

    /// No response within the deadline.
    #[error("discount service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection-level failure.
    #[error("discount service unreachable: {reason}")]
    Transport { reason: String },

    /// The service answered with something we could not interpret.
    #[error("unexpected discount service response: {reason}")]
    Protocol { reason: String },
}

impl DiscountServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DiscountServiceError::Invalid {
            message: message.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        DiscountServiceError::Transport {
            reason: reason.into(),
        }
    }

    pub fn protocol(reason: impl Into<String>) -> Self {
        DiscountServiceError::Protocol {
            reason: reason.into(),
        }
    }

    /// Human-readable message for the discount field of the form.
    pub fn user_message(&self) -> String {
        match self {
            DiscountServiceError::Invalid { message } => message.clone(),
            DiscountServiceError::Timeout { .. }
            | DiscountServiceError::Transport { .. }
            | DiscountServiceError::Protocol { .. } => {
                "Could not verify the discount code. Please try again.".to_string()
            }
        }
    }
}

/// Port for the remote discount authority.
#[async_trait]
pub trait DiscountValidator: Send + Sync {
    /// Validates a code against the given pricing inputs.
    ///
    /// # Returns
    ///
    /// - `Ok(check)` with `discount_amount > 0` - code applies
    /// - `Ok(check)` with `discount_amount == 0` - code recognized, not
    ///   applicable to these inputs
    /// - `Err(_)` - rejection or infrastructure failure
    async fn validate(
        &self,
        request: DiscountCheckRequest,
    ) -> Result<DiscountCheck, DiscountServiceError>;
}
