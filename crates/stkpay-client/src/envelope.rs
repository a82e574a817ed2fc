//! Response envelope handling.
//!
//! The gateway wraps payloads inconsistently depending on the product
//! endpoint:
//!
//! | Shape | Example |
//! |-------|---------|
//! | double | `{"data": {"data": {"paymentId": "p1"}}}` |
//! | single | `{"data": {"paymentId": "p1"}}` |
//! | bare   | `{"paymentId": "p1"}` |
//!
//! [`unwrap_envelope`] checks `data.data` before `data`, then falls back to
//! the body itself.

use serde_json::Value;
use stkpay_core::{PaymentId, PaymentStatus};

/// Return the innermost payload object of a response body.
pub fn unwrap_envelope(body: &Value) -> &Value {
    let outer = match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => return body,
    };
    match outer.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => outer,
    }
}

/// Extract the payment identifier from an initiation response.
///
/// Reads `paymentId`, falling back to `payment_id`. Numeric identifiers are
/// accepted and rendered as strings. Blank values yield `None`.
pub fn extract_payment_id(body: &Value) -> Option<PaymentId> {
    let payload = unwrap_envelope(body);
    let raw = payload
        .get("paymentId")
        .or_else(|| payload.get("payment_id"))?;
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    PaymentId::new(text).ok()
}

/// Extract and normalize the status from a status response.
pub fn extract_status(body: &Value) -> Option<PaymentStatus> {
    unwrap_envelope(body)
        .get("status")
        .and_then(Value::as_str)
        .map(PaymentStatus::from_raw)
}

/// Extract a human-readable message from an error response body.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    message_of(&value)
}

/// Read `message` (or `error`) from the body root, then from the envelope
/// payload. Blank messages yield `None`.
pub fn message_of(body: &Value) -> Option<String> {
    let lookup = |v: &Value| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    };
    lookup(body).or_else(|| lookup(unwrap_envelope(body)))
}
