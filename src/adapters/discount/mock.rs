//! Mock discount validator for testing.
//!
//! Provides a configurable mock implementation of `DiscountValidator` for
//! unit and integration tests. Supports:
//! - Scripted responses, consumed in order
//! - Error injection
//! - Latency injection (for debounce/stale/timeout scenarios)
//! - Request capture

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{DiscountCheck, DiscountCheckRequest, DiscountServiceError, DiscountValidator};

struct Scripted {
    outcome: Result<DiscountCheck, DiscountServiceError>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    requests: Vec<DiscountCheckRequest>,
}

/// Mock discount validator.
///
/// Clones share the same script and captured requests.
///
/// # Example
///
/// ```ignore
/// let mock = MockDiscountValidator::new();
/// mock.enqueue_ok(DiscountCheck { discount_amount: dec, .. });
/// mock.enqueue_err(DiscountServiceError::invalid("expired"));
///
/// let result = mock.validate(request).await;
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockDiscountValidator {
    inner: Arc<Mutex<MockState>>,
}

impl MockDiscountValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn enqueue_ok(&self, check: DiscountCheck) {
        self.push(Ok(check), None);
    }

    /// Queues a successful response delivered after a delay.
    pub fn enqueue_ok_after(&self, check: DiscountCheck, delay: Duration) {
        self.push(Ok(check), Some(delay));
    }

    /// Queues an error.
    pub fn enqueue_err(&self, err: DiscountServiceError) {
        self.push(Err(err), None);
    }

    /// Queues an error delivered after a delay.
    pub fn enqueue_err_after(&self, err: DiscountServiceError, delay: Duration) {
        self.push(Err(err), Some(delay));
    }

    /// Number of validation calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<DiscountCheckRequest> {
        self.lock().requests.last().cloned()
    }

    /// All captured requests, in call order.
    pub fn requests(&self) -> Vec<DiscountCheckRequest> {
        self.lock().requests.clone()
    }

    fn push(&self, outcome: Result<DiscountCheck, DiscountServiceError>, delay: Option<Duration>) {
        self.lock().queue.push_back(Scripted { outcome, delay });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().expect("MockDiscountValidator: lock poisoned")
    }
}

#[async_trait]
impl DiscountValidator for MockDiscountValidator {
    async fn validate(
        &self,
        request: DiscountCheckRequest,
    ) -> Result<DiscountCheck, DiscountServiceError> {
        let scripted = {
            let mut state = self.lock();
            state.requests.push(request);
            state.queue.pop_front()
        };

        let Some(scripted) = scripted else {
            return Err(DiscountServiceError::protocol("no scripted response queued"));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::ProductType;
    use crate::domain::foundation::ProductId;
    use rust_decimal::Decimal;

    fn request(code: &str) -> DiscountCheckRequest {
        DiscountCheckRequest {
            product_type: ProductType::Activity,
            product_id: ProductId::try_new("p-1").unwrap(),
            discount_code: code.into(),
            unit_count: 1,
            selected_addons: vec![],
            date_range: None,
        }
    }

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let mock = MockDiscountValidator::new();
        mock.enqueue_ok(DiscountCheck {
            discount_amount: Decimal::ONE,
            total_amount: Decimal::ZERO,
            message: None,
        });
        mock.enqueue_err(DiscountServiceError::invalid("expired"));

        assert!(mock.validate(request("A")).await.is_ok());
        assert!(mock.validate(request("B")).await.is_err());
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.last_request().unwrap().discount_code, "B");
    }

    #[tokio::test]
    async fn exhausted_script_fails_loudly() {
        let mock = MockDiscountValidator::new();
        let err = mock.validate(request("A")).await.unwrap_err();
        assert!(matches!(err, DiscountServiceError::Protocol { .. }));
    }
}
