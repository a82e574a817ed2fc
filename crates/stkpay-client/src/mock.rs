//! # Scripted Gateway
//!
//! In-process [`PaymentGateway`] for tests and dry runs. The initiation
//! result is fixed; status queries replay a queue of steps, and once the
//! queue drains the last step repeats (an empty script reports `PENDING`
//! forever).
//!
//! ```
//! use stkpay_client::MockGateway;
//!
//! let gateway = MockGateway::new()
//!     .initiate_ok("ws_CO_001")
//!     .status("PENDING")
//!     .transient("connection reset")
//!     .status("COMPLETED");
//! assert_eq!(gateway.status_calls(), 0);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use stkpay_core::{Msisdn, PaymentHandle, PaymentId, PaymentStatus};

use crate::error::GatewayError;
use crate::gateway::PaymentGateway;

#[derive(Debug, Clone)]
enum InitiateStep {
    Ok(String),
    WithoutId,
    Err(String),
}

#[derive(Debug, Clone)]
enum PollStep {
    Status(PaymentStatus),
    Transient(String),
}

/// Scripted gateway with call counters.
#[derive(Debug)]
pub struct MockGateway {
    initiate: InitiateStep,
    script: Mutex<VecDeque<PollStep>>,
    last: Mutex<Option<PollStep>>,
    charged: Mutex<Vec<Msisdn>>,
    polled: Mutex<Vec<PaymentId>>,
    initiate_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl MockGateway {
    /// Gateway that accepts every charge as `MOCK-PAY-1` and reports
    /// `PENDING` until scripted otherwise.
    pub fn new() -> Self {
        Self {
            initiate: InitiateStep::Ok("MOCK-PAY-1".to_string()),
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            charged: Mutex::new(Vec::new()),
            polled: Mutex::new(Vec::new()),
            initiate_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        }
    }

    /// Initiation succeeds with this payment identifier.
    pub fn initiate_ok(mut self, payment_id: impl Into<String>) -> Self {
        self.initiate = InitiateStep::Ok(payment_id.into());
        self
    }

    /// Initiation responds without a payment identifier.
    pub fn initiate_without_id(mut self) -> Self {
        self.initiate = InitiateStep::WithoutId;
        self
    }

    /// Initiation fails with this upstream message.
    pub fn initiate_err(mut self, message: impl Into<String>) -> Self {
        self.initiate = InitiateStep::Err(message.into());
        self
    }

    /// Queue a status query answered with a raw gateway status string.
    pub fn status(self, raw: &str) -> Self {
        self.script
            .lock()
            .push_back(PollStep::Status(PaymentStatus::from_raw(raw)));
        self
    }

    /// Queue a status query that fails with a transient error.
    pub fn transient(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .push_back(PollStep::Transient(message.into()));
        self
    }

    /// Number of initiation calls received.
    pub fn initiate_calls(&self) -> u32 {
        self.initiate_calls.load(Ordering::SeqCst)
    }

    /// Number of status queries received.
    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Numbers charged, in call order.
    pub fn charged_numbers(&self) -> Vec<Msisdn> {
        self.charged.lock().clone()
    }

    /// Payment identifiers polled, in call order.
    pub fn polled_ids(&self) -> Vec<PaymentId> {
        self.polled.lock().clone()
    }

    fn next_step(&self) -> PollStep {
        let mut last = self.last.lock();
        if let Some(step) = self.script.lock().pop_front() {
            *last = Some(step);
        }
        last.clone()
            .unwrap_or(PollStep::Status(PaymentStatus::Pending))
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initiate_charge(&self, msisdn: &Msisdn) -> Result<PaymentHandle, GatewayError> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        self.charged.lock().push(msisdn.clone());
        match &self.initiate {
            InitiateStep::Ok(id) => PaymentId::new(id.clone())
                .map(PaymentHandle::new)
                .map_err(|_| GatewayError::MissingPaymentId {
                    endpoint: "mock initiate".into(),
                    message: None,
                }),
            InitiateStep::WithoutId => Err(GatewayError::MissingPaymentId {
                endpoint: "mock initiate".into(),
                message: None,
            }),
            InitiateStep::Err(message) => Err(GatewayError::Unavailable(message.clone())),
        }
    }

    async fn payment_status(
        &self,
        payment_id: &PaymentId,
    ) -> Result<PaymentStatus, GatewayError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled.lock().push(payment_id.clone());
        match self.next_step() {
            PollStep::Status(status) => Ok(status),
            PollStep::Transient(message) => Err(GatewayError::Unavailable(message)),
        }
    }

    fn gateway_name(&self) -> &str {
        "MockGateway"
    }
}
