//! Mock order gateway for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{CreatedOrder, OrderDraft, OrderGateway, OrderServiceError};

struct Scripted {
    outcome: Result<CreatedOrder, OrderServiceError>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    drafts: Vec<OrderDraft>,
}

/// Mock order gateway with scripted outcomes and draft capture.
///
/// Clones share the same script and captured drafts.
#[derive(Clone, Default)]
pub struct MockOrderGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful order creation.
    pub fn enqueue_ok(&self, order: CreatedOrder) {
        self.push(Ok(order), None);
    }

    /// Queues a successful order creation delivered after a delay.
    pub fn enqueue_ok_after(&self, order: CreatedOrder, delay: Duration) {
        self.push(Ok(order), Some(delay));
    }

    /// Queues an error.
    pub fn enqueue_err(&self, err: OrderServiceError) {
        self.push(Err(err), None);
    }

    /// Number of order-creation calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock().drafts.len()
    }

    /// The most recently submitted draft, if any.
    pub fn last_draft(&self) -> Option<OrderDraft> {
        self.lock().drafts.last().cloned()
    }

    fn push(&self, outcome: Result<CreatedOrder, OrderServiceError>, delay: Option<Duration>) {
        self.lock().queue.push_back(Scripted { outcome, delay });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().expect("MockOrderGateway: lock poisoned")
    }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn create_order(&self, draft: OrderDraft) -> Result<CreatedOrder, OrderServiceError> {
        let scripted = {
            let mut state = self.lock();
            state.drafts.push(draft);
            state.queue.pop_front()
        };

        let Some(scripted) = scripted else {
            return Err(OrderServiceError::Service {
                status: 500,
                message: "no scripted response queued".to_string(),
            });
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.outcome
    }
}
