//! BookingSubmission - field validation, payload assembly, and server error
//! mapping.
//!
//! The submission lifecycle is `Ready -> Submitting -> (Success | Failed)`.
//! `Submitting` blocks re-entrant submission, `Failed` returns to `Ready`
//! with field errors populated for correction, `Success` is terminal for the
//! form instance.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::booking::{is_known_field, BookingForm, FieldErrors};
use crate::ports::{CreatedOrder, OrderDraft, OrderGateway, OrderServiceError};

use super::booking_session::BookingSession;

/// Where a form instance is in its submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Ready,
    Submitting,
    Succeeded,
}

/// Why a submission did not produce an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Per-field errors, either from local validation or mapped from a
    /// 422-style server response. The form is back in `Ready`.
    #[error("booking rejected with {} field error(s)", .errors.len())]
    Invalid { errors: FieldErrors },

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    InFlight,

    /// This form instance already produced an order.
    #[error("this booking was already submitted")]
    AlreadySubmitted,

    /// Non-validation failure (network, server, auth), surfaced as one
    /// general message. The form is back in `Ready`.
    #[error("{message}")]
    Failed { message: String },
}

/// Orchestrates order creation for one booking form.
pub struct BookingSubmission {
    gateway: Arc<dyn OrderGateway>,
    status: Mutex<SubmissionStatus>,
}

impl BookingSubmission {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self {
            gateway,
            status: Mutex::new(SubmissionStatus::Ready),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        *self.status.lock().expect("submission status lock poisoned")
    }

    /// Validates the form, assembles the order payload from the session's
    /// current snapshot, and calls the order service.
    ///
    /// The discount code is attached only when the discount is `Applied` at
    /// this instant; unconfirmed or rejected code text is never sent.
    pub async fn submit(
        &self,
        session: &BookingSession,
        form: &BookingForm,
    ) -> Result<CreatedOrder, SubmitError> {
        {
            let mut status = self.status.lock().expect("submission status lock poisoned");
            match *status {
                SubmissionStatus::Submitting => return Err(SubmitError::InFlight),
                SubmissionStatus::Succeeded => return Err(SubmitError::AlreadySubmitted),
                SubmissionStatus::Ready => *status = SubmissionStatus::Submitting,
            }
        }

        let result = self.run(session, form).await;

        let mut status = self.status.lock().expect("submission status lock poisoned");
        *status = match result {
            Ok(_) => SubmissionStatus::Succeeded,
            Err(_) => SubmissionStatus::Ready,
        };
        result
    }

    async fn run(
        &self,
        session: &BookingSession,
        form: &BookingForm,
    ) -> Result<CreatedOrder, SubmitError> {
        let product = session.product();
        let snapshot = session.snapshot();

        // 1. Client-side validation, resolved without network access.
        let errors = form.validate(product.product_type, &snapshot.inputs, &snapshot.totals);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid { errors });
        }

        // 2. Assemble the payload from the snapshot taken at submit time.
        let draft = OrderDraft {
            product_type: product.product_type,
            product_id: product.id.clone(),
            unit_count: snapshot.inputs.unit_count,
            selected_addons: snapshot
                .inputs
                .selected_addons
                .iter()
                .map(String::from)
                .collect(),
            travel_date: form.travel_date,
            date_range: snapshot.inputs.date_range,
            contact_name: form.contact_name.clone(),
            contact_email: form.contact_email.clone(),
            contact_phone: form.contact_phone.clone(),
            pickup_point: form.pickup_point.clone(),
            notes: form.notes.clone(),
            extensions: snapshot.inputs.extensions.clone(),
            discount_code: snapshot.discount.confirmed_code().map(String::from),
            grand_total: snapshot.totals.grand_total,
        };

        // 3. Create the order and translate failures into the UI error
        //    model.
        match self.gateway.create_order(draft).await {
            Ok(order) => {
                tracing::info!(order_id = %order.id, "order created");
                Ok(order)
            }
            Err(OrderServiceError::Validation { errors }) => {
                tracing::warn!(fields = errors.len(), "order rejected by server validation");
                Err(SubmitError::Invalid {
                    errors: map_server_errors(errors),
                })
            }
            Err(err @ (OrderServiceError::Timeout { .. } | OrderServiceError::Transport { .. })) => {
                tracing::warn!(error = %err, "order submission failed to reach the service");
                Err(SubmitError::Failed {
                    message: "Could not reach the booking service. Please try again.".to_string(),
                })
            }
            Err(OrderServiceError::Service { status, message }) => {
                tracing::error!(status, %message, "order service returned an error");
                Err(SubmitError::Failed {
                    message: "Something went wrong while creating your booking. Please try again."
                        .to_string(),
                })
            }
        }
    }
}

/// Maps server-reported field names 1:1 onto UI fields; anything the form
/// does not know lands under `general`.
fn map_server_errors(server: BTreeMap<String, String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let mut general = Vec::new();
    for (field, message) in server {
        if is_known_field(&field) {
            errors.insert(field, message);
        } else {
            general.push(message);
        }
    }
    if !general.is_empty() {
        errors.insert("general", general.join(" "));
    }
    errors
}
