//! HTTP handlers for the booking engine endpoints.
//!
//! These handlers connect Axum routes to the booking session and submission
//! components. One session per booking id, held in an in-memory registry;
//! all state is ephemeral and discarded when the booking is closed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::application::{BookingSession, BookingSubmission, SessionConfig, SubmitError};
use crate::domain::booking::BookingForm;
use crate::domain::foundation::BookingId;
use crate::domain::pricing::DateRange;
use crate::ports::{DiscountValidator, OrderGateway};

use super::dto::{
    ApplyDiscountRequest, BookingStateResponse, CreateBookingRequest, DiscountStateResponse,
    ErrorResponse, OrderCreatedResponse, SubmitBookingRequest, UpdateInputsRequest,
};

/// One live booking form: its session engine and its submission lifecycle.
#[derive(Clone)]
struct BookingEntry {
    session: BookingSession,
    submission: Arc<BookingSubmission>,
}

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct BookingAppState {
    discount_validator: Arc<dyn DiscountValidator>,
    order_gateway: Arc<dyn OrderGateway>,
    session_config: SessionConfig,
    bookings: Arc<RwLock<HashMap<BookingId, BookingEntry>>>,
}

impl BookingAppState {
    pub fn new(
        discount_validator: Arc<dyn DiscountValidator>,
        order_gateway: Arc<dyn OrderGateway>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            discount_validator,
            order_gateway,
            session_config,
            bookings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn insert(&self, id: BookingId, entry: BookingEntry) {
        self.bookings
            .write()
            .expect("booking registry lock poisoned")
            .insert(id, entry);
    }

    fn get(&self, id: &BookingId) -> Option<BookingEntry> {
        self.bookings
            .read()
            .expect("booking registry lock poisoned")
            .get(id)
            .cloned()
    }

    fn remove(&self, id: &BookingId) -> Option<BookingEntry> {
        self.bookings
            .write()
            .expect("booking registry lock poisoned")
            .remove(id)
    }
}

fn input_error(err: crate::domain::foundation::ValidationError) -> Response {
    let mut fields = crate::domain::booking::FieldErrors::new();
    fields.insert(err.field().to_string(), err.to_string());
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::with_fields("Invalid pricing input", fields)),
    )
        .into_response()
}

fn not_found(id: BookingId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::general(format!("No booking '{}'", id))),
    )
        .into_response()
}

fn booking_state(id: BookingId, entry: &BookingEntry) -> BookingStateResponse {
    BookingStateResponse {
        booking_id: id.to_string(),
        totals: entry.session.totals().into(),
        discount: entry.session.discount_state().into(),
    }
}

/// `POST /bookings` - open a booking session for a product.
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Response {
    let session = BookingSession::new(
        request.product,
        state.discount_validator.clone(),
        state.session_config,
    );
    let submission = Arc::new(BookingSubmission::new(state.order_gateway.clone()));
    let entry = BookingEntry {
        session,
        submission,
    };

    let id = BookingId::new();
    let response = booking_state(id, &entry);
    state.insert(id, entry);
    tracing::info!(booking_id = %id, "booking session opened");

    (StatusCode::CREATED, Json(response)).into_response()
}

/// `GET /bookings/:id` - current totals and discount state.
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let id = BookingId::from_uuid(id);
    match state.get(&id) {
        Some(entry) => Json(booking_state(id, &entry)).into_response(),
        None => not_found(id),
    }
}

/// `PATCH /bookings/:id/inputs` - mutate pricing inputs.
///
/// Totals in the response reflect the change immediately; an applied
/// discount is revalidated in the background after the debounce window.
pub async fn update_inputs(
    State(state): State<BookingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInputsRequest>,
) -> Response {
    let id = BookingId::from_uuid(id);
    let Some(entry) = state.get(&id) else {
        return not_found(id);
    };

    if let Some(unit_count) = request.unit_count {
        if let Err(err) = entry.session.set_unit_count(unit_count) {
            return input_error(err);
        }
    }

    if let Some(name) = &request.toggle_addon {
        if let Err(err) = entry.session.toggle_addon(name) {
            return input_error(err);
        }
    }

    if let Some(range) = request.date_range {
        match DateRange::try_new(range.start, range.end) {
            Ok(range) => entry.session.set_date_range(range),
            Err(err) => return input_error(err),
        }
    }

    for (key, value) in request.extensions {
        entry.session.set_extension(key, value);
    }

    Json(booking_state(id, &entry)).into_response()
}

/// `POST /bookings/:id/discount` - store a code and validate it.
pub async fn apply_discount(
    State(state): State<BookingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyDiscountRequest>,
) -> Response {
    let id = BookingId::from_uuid(id);
    let Some(entry) = state.get(&id) else {
        return not_found(id);
    };

    entry.session.set_discount_code(&request.code);
    let discount = entry.session.apply_code().await;

    Json(BookingStateResponse {
        booking_id: id.to_string(),
        totals: entry.session.totals().into(),
        discount: DiscountStateResponse::from(discount),
    })
    .into_response()
}

/// `POST /bookings/:id/submit` - validate and create the order.
pub async fn submit_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitBookingRequest>,
) -> Response {
    let id = BookingId::from_uuid(id);
    let Some(entry) = state.get(&id) else {
        return not_found(id);
    };

    let form = BookingForm {
        travel_date: request.travel_date,
        contact_name: request.contact_name,
        contact_email: request.contact_email,
        contact_phone: request.contact_phone,
        pickup_point: request.pickup_point,
        notes: request.notes,
    };

    match entry.submission.submit(&entry.session, &form).await {
        Ok(order) => (
            StatusCode::CREATED,
            Json(OrderCreatedResponse { order_id: order.id }),
        )
            .into_response(),
        Err(SubmitError::Invalid { errors }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::with_fields(
                "Please correct the highlighted fields.",
                errors,
            )),
        )
            .into_response(),
        Err(err @ (SubmitError::InFlight | SubmitError::AlreadySubmitted)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::general(err.to_string())),
        )
            .into_response(),
        Err(SubmitError::Failed { message }) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::general(message)),
        )
            .into_response(),
    }
}

/// `DELETE /bookings/:id` - close the form and discard its state.
pub async fn close_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let id = BookingId::from_uuid(id);
    match state.remove(&id) {
        Some(entry) => {
            entry.session.reset();
            tracing::info!(booking_id = %id, "booking session closed");
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(id),
    }
}
