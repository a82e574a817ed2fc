//! The payment gateway seam.
//!
//! Implementations must be `Send + Sync` so they can be shared across async
//! tasks behind an `Arc`. The trait is object-safe to support runtime
//! adapter selection (mock vs. live).

use std::sync::Arc;

use async_trait::async_trait;
use stkpay_core::{Msisdn, PaymentHandle, PaymentId, PaymentStatus};

use crate::error::GatewayError;

/// Mobile-money gateway operations used by the tracker.
///
/// ## Operations
///
/// - **initiate_charge**: push an STK prompt to the subscriber's phone
/// - **payment_status**: query the status of a previously initiated charge
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initiate a charge against `msisdn`.
    ///
    /// A response without a usable payment identifier is an error
    /// ([`GatewayError::MissingPaymentId`]).
    async fn initiate_charge(&self, msisdn: &Msisdn) -> Result<PaymentHandle, GatewayError>;

    /// Query the current normalized status of a charge.
    async fn payment_status(&self, payment_id: &PaymentId)
        -> Result<PaymentStatus, GatewayError>;

    /// Human-readable name of this implementation (e.g. "HttpGateway").
    fn gateway_name(&self) -> &str;
}

#[async_trait]
impl<G: PaymentGateway + ?Sized> PaymentGateway for Arc<G> {
    async fn initiate_charge(&self, msisdn: &Msisdn) -> Result<PaymentHandle, GatewayError> {
        (**self).initiate_charge(msisdn).await
    }

    async fn payment_status(
        &self,
        payment_id: &PaymentId,
    ) -> Result<PaymentStatus, GatewayError> {
        (**self).payment_status(payment_id).await
    }

    fn gateway_name(&self) -> &str {
        (**self).gateway_name()
    }
}
