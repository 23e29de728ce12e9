//! Discount code validation lifecycle.
//!
//! The state machine is `Idle -> Checking -> (Applied | Rejected)`, and back
//! to `Idle` whenever the code text changes. The invariant maintained by
//! every transition: `confirmed_amount` is non-zero only while the status is
//! `Applied`, and it always refers to the code last sent for validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a discount code currently is in its validation lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    /// No code applied, or the code text changed since the last check.
    #[default]
    Idle,

    /// A manual validation request is in flight.
    Checking,

    /// The remote authority confirmed a non-zero discount for the current
    /// code and pricing inputs.
    Applied,

    /// The last check failed or returned a zero discount.
    Rejected,
}

/// The discount portion of a booking-form session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountState {
    code: String,
    confirmed_amount: Decimal,
    status: DiscountStatus,
    message: Option<String>,
}

impl DiscountState {
    /// Fresh state for a newly (re)initialized booking form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores new code text, normalized to uppercase.
    ///
    /// Unconditionally clears the confirmed amount, status, and message: the
    /// UI must never show an active discount for a code different from the
    /// one last validated.
    pub fn set_code(&mut self, text: &str) {
        self.code = text.trim().to_uppercase();
        self.confirmed_amount = Decimal::ZERO;
        self.status = DiscountStatus::Idle;
        self.message = None;
    }

    /// Attempts to start a manual check.
    ///
    /// Returns `false` without changing state when the code is blank or a
    /// check is already in flight. Otherwise moves to `Checking` and zeroes
    /// the displayed amount.
    pub fn begin_check(&mut self) -> bool {
        if self.code.is_empty() || self.status == DiscountStatus::Checking {
            return false;
        }
        self.status = DiscountStatus::Checking;
        self.confirmed_amount = Decimal::ZERO;
        self.message = None;
        true
    }

    /// Commits a validator response: a positive amount applies the discount,
    /// a zero amount rejects it as recognized-but-not-applicable.
    pub fn commit_amount(&mut self, amount: Decimal, message: Option<String>) {
        if amount > Decimal::ZERO {
            self.status = DiscountStatus::Applied;
            self.confirmed_amount = amount;
            self.message = Some(message.unwrap_or_else(|| "Discount applied.".to_string()));
        } else {
            self.reject(
                message.unwrap_or_else(|| {
                    "This code is valid but not applicable to your booking.".to_string()
                }),
            );
        }
    }

    /// Rejects the current code with a human-readable reason.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.status = DiscountStatus::Rejected;
        self.confirmed_amount = Decimal::ZERO;
        self.message = Some(message.into());
    }

    /// Resets to the initial state (form reinitialized).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn status(&self) -> DiscountStatus {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The amount last confirmed by the authority; zero unless `Applied`.
    pub fn confirmed_amount(&self) -> Decimal {
        self.confirmed_amount
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_applied(&self) -> bool {
        self.status == DiscountStatus::Applied
    }

    /// The code to attach to an order payload: present only while the
    /// discount is confirmed.
    pub fn confirmed_code(&self) -> Option<&str> {
        if self.is_applied() && !self.code.is_empty() {
            Some(&self.code)
        } else {
            None
        }
    }
}
