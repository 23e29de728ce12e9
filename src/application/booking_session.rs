//! BookingSession - the stateful pricing/discount reconciliation engine.
//!
//! One session owns the pricing inputs and discount state of a single
//! booking form. Pricing mutations are synchronous and reflected in totals
//! immediately; discount validation is asynchronous and reconciled through
//! two rules:
//!
//! - **Debounced revalidation**: a pricing-relevant change while a discount
//!   is applied schedules a revalidation after a quiet period. New changes
//!   restart the timer, so at most one revalidation is pending and only the
//!   last input state is ever checked.
//! - **Stale-response discard**: every validation request takes the next
//!   value of a monotonic sequence; a response commits only if its sequence
//!   still equals the most recently issued one. Last write wins by request
//!   identity, not arrival order.
//!
//! State is ephemeral per form instance; dropping the session discards it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::booking::{Product, ProductType};
use crate::domain::discount::DiscountState;
use crate::domain::foundation::ValidationError;
use crate::domain::pricing::{DateRange, PricingInputs, Totals};
use crate::ports::{DiscountCheckRequest, DiscountServiceError, DiscountValidator};

/// Timing knobs for the discount protocol.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Quiet period after the last pricing change before a revalidation is
    /// issued.
    pub debounce_window: Duration,

    /// Deadline for a single validation request.
    pub request_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(600),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// A consistent read of the session for display or submission.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub inputs: PricingInputs,
    pub discount: DiscountState,
    pub totals: Totals,
}

struct SessionState {
    inputs: PricingInputs,
    discount: DiscountState,
}

struct SessionInner {
    product: Product,
    config: SessionConfig,
    validator: Arc<dyn DiscountValidator>,
    state: Mutex<SessionState>,
    revalidation: Mutex<Option<JoinHandle<()>>>,
    seq: AtomicU64,
}

/// The booking-form session engine.
///
/// Cheap to clone; clones share the same underlying session.
#[derive(Clone)]
pub struct BookingSession {
    inner: Arc<SessionInner>,
}

impl BookingSession {
    /// Opens a session for a loaded product.
    pub fn new(
        product: Product,
        validator: Arc<dyn DiscountValidator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                product,
                config,
                validator,
                state: Mutex::new(SessionState {
                    inputs: PricingInputs::new(),
                    discount: DiscountState::new(),
                }),
                revalidation: Mutex::new(None),
                seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn product(&self) -> &Product {
        &self.inner.product
    }

    /// Sets the unit count (participants, days, tickets).
    pub fn set_unit_count(&self, unit_count: u32) -> Result<(), ValidationError> {
        if unit_count < 1 {
            return Err(ValidationError::below_minimum("unit_count", 1, unit_count));
        }
        {
            let mut state = self.lock_state();
            state.inputs.unit_count = unit_count;
        }
        self.after_pricing_change();
        Ok(())
    }

    /// Toggles an addon from the product catalog. Returns whether the addon
    /// is selected afterwards.
    pub fn toggle_addon(&self, name: &str) -> Result<bool, ValidationError> {
        if self.inner.product.addons.get(name).is_none() {
            return Err(ValidationError::invalid_format(
                "addons",
                format!("unknown addon '{}'", name),
            ));
        }
        let selected = {
            let mut state = self.lock_state();
            state.inputs.selected_addons.toggle(name)
        };
        self.after_pricing_change();
        Ok(selected)
    }

    /// Sets the date range. For car rentals the rental duration is the unit
    /// count, so the count follows the range.
    pub fn set_date_range(&self, range: DateRange) {
        {
            let mut state = self.lock_state();
            state.inputs.date_range = Some(range);
            if self.inner.product.product_type == ProductType::CarRental {
                state.inputs.unit_count = range.days().max(1);
            }
        }
        self.after_pricing_change();
    }

    /// Sets a product-specific extension field (nationality, pickup point,
    /// ...).
    pub fn set_extension(&self, key: impl Into<String>, value: impl Into<String>) {
        {
            let mut state = self.lock_state();
            state.inputs.extensions.insert(key.into(), value.into());
        }
        self.after_pricing_change();
    }

    /// Stores new discount code text.
    ///
    /// Besides the state-machine reset, this invalidates any in-flight
    /// validation: a response for previously entered text must never attach
    /// an amount to the new text.
    pub fn set_discount_code(&self, text: &str) {
        self.cancel_pending_revalidation();
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock_state();
        state.discount.set_code(text);
    }

    /// Manually validates the current code against the remote authority.
    ///
    /// No-op returning the current state when the code is blank or a check
    /// is already in flight. Resolves to `Applied` or `Rejected`; failures
    /// never propagate, they degrade to a rejected state with a message.
    pub async fn apply_code(&self) -> DiscountState {
        self.cancel_pending_revalidation();
        let request = {
            let mut state = self.lock_state();
            if !state.discount.begin_check() {
                return state.discount.clone();
            }
            self.inner.build_request(&state)
        };
        let seq = self.inner.next_seq();
        self.inner.run_check(seq, request).await;
        self.discount_state()
    }

    /// Current discount state.
    pub fn discount_state(&self) -> DiscountState {
        self.lock_state().discount.clone()
    }

    /// Recomputes the authoritative totals from the current state.
    pub fn totals(&self) -> Totals {
        let mut state = self.lock_state();
        self.compute_totals(&mut state)
    }

    /// A consistent snapshot of inputs, discount, and totals.
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut state = self.lock_state();
        let totals = self.compute_totals(&mut state);
        SessionSnapshot {
            inputs: state.inputs.clone(),
            discount: state.discount.clone(),
            totals,
        }
    }

    /// Returns the form to its freshly opened state.
    pub fn reset(&self) {
        self.cancel_pending_revalidation();
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock_state();
        state.inputs.reset();
        state.discount.reset();
    }

    fn compute_totals(&self, state: &mut SessionState) -> Totals {
        let product = &self.inner.product;
        let unit_price = product.pricing.unit_price(state.inputs.unit_count);
        let addon_total = state.inputs.selected_addons.total(&product.addons);
        Totals::compute(
            unit_price,
            state.inputs.unit_count,
            addon_total,
            state.discount.confirmed_amount(),
        )
    }

    /// Called after every pricing-relevant mutation: an applied discount may
    /// have been computed from a basis that just changed, so schedule a
    /// revalidation for after the quiet period.
    fn after_pricing_change(&self) {
        let applied = {
            let state = self.lock_state();
            state.discount.is_applied() && !state.discount.code().is_empty()
        };
        if applied {
            self.schedule_revalidation();
        }
    }

    fn schedule_revalidation(&self) {
        let inner = Arc::clone(&self.inner);
        let mut pending = self
            .inner
            .revalidation
            .lock()
            .expect("revalidation lock poisoned");
        // Restart, don't queue: only the last input state gets checked.
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.config.debounce_window).await;
            inner.revalidate().await;
        }));
    }

    fn cancel_pending_revalidation(&self) {
        let mut pending = self
            .inner
            .revalidation
            .lock()
            .expect("revalidation lock poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner.state.lock().expect("session state lock poisoned")
    }
}

impl SessionInner {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn build_request(&self, state: &SessionState) -> DiscountCheckRequest {
        DiscountCheckRequest {
            product_type: self.product.product_type,
            product_id: self.product.id.clone(),
            discount_code: state.discount.code().to_string(),
            unit_count: state.inputs.unit_count,
            selected_addons: state
                .inputs
                .selected_addons
                .iter()
                .filter(|name| self.product.addons.get(name).is_some())
                .map(String::from)
                .collect(),
            date_range: state.inputs.date_range,
        }
    }

    /// Debounced background revalidation. The session stays `Applied` with
    /// the old amount on display until the response lands; the sequence
    /// check alone decides whether that response commits.
    async fn revalidate(self: Arc<Self>) {
        let request = {
            let state = self.state.lock().expect("session state lock poisoned");
            if !state.discount.is_applied() || state.discount.code().is_empty() {
                return;
            }
            self.build_request(&state)
        };
        let seq = self.next_seq();
        self.run_check(seq, request).await;
    }

    async fn run_check(&self, seq: u64, request: DiscountCheckRequest) {
        let code = request.discount_code.clone();
        tracing::debug!(seq, code = %code, unit_count = request.unit_count, "validating discount code");

        let outcome =
            tokio::time::timeout(self.config.request_timeout, self.validator.validate(request))
                .await;

        let mut state = self.state.lock().expect("session state lock poisoned");
        if seq != self.seq.load(Ordering::SeqCst) {
            tracing::debug!(seq, code = %code, "discarding stale discount validation response");
            return;
        }

        match outcome {
            Ok(Ok(check)) => {
                tracing::info!(seq, code = %code, amount = %check.discount_amount, "discount validation resolved");
                state.discount.commit_amount(check.discount_amount, check.message);
            }
            Ok(Err(err)) => {
                tracing::warn!(seq, code = %code, error = %err, "discount validation failed");
                state.discount.reject(err.user_message());
            }
            Err(_elapsed) => {
                let err = DiscountServiceError::Timeout {
                    timeout_secs: self.config.request_timeout.as_secs(),
                };
                tracing::warn!(seq, code = %code, "discount validation timed out");
                state.discount.reject(err.user_message());
            }
        }
    }
}
