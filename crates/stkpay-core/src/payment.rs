//! # Payment Identifiers and Status
//!
//! The gateway hands back an opaque payment identifier on initiation and a
//! raw status string on every poll. Both are normalized here so the tracker
//! never branches on raw gateway text.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque payment identifier assigned by the gateway on initiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    /// Create a payment identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPaymentId`] if nothing is left after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPaymentId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PaymentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Result of a successful initiation: the charge was accepted and can be
/// polled. Each handle belongs to exactly one tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHandle {
    /// Identifier used for status queries.
    pub payment_id: PaymentId,
}

impl PaymentHandle {
    /// Wrap an identifier returned by the gateway.
    pub fn new(payment_id: PaymentId) -> Self {
        Self { payment_id }
    }
}

/// Normalized payment status.
///
/// The gateway reports success as either `SUCCESS` or `COMPLETED`
/// depending on which product endpoint issued the charge. Both map to
/// [`PaymentStatus::Success`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Charge sent; awaiting subscriber confirmation.
    Pending,
    /// Subscriber confirmed and the charge settled.
    Success,
    /// Charge failed.
    Failed,
    /// Subscriber dismissed or cancelled the prompt.
    Cancelled,
    /// Status string outside the known set. Not terminal.
    Unknown,
}

impl PaymentStatus {
    /// Normalize a raw gateway status string.
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "SUCCESS" | "COMPLETED" => Self::Success,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Whether polling stops on this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }

    /// Canonical upper-case spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_success_spellings_normalize_to_success() {
        assert_eq!(PaymentStatus::from_raw("SUCCESS"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_raw("COMPLETED"), PaymentStatus::Success);
    }

    #[test]
    fn from_raw_ignores_case_and_whitespace() {
        assert_eq!(PaymentStatus::from_raw(" pending "), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_raw("Completed"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_raw("cancelled\n"), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::from_raw("failed"), PaymentStatus::Failed);
    }

    #[test]
    fn unrecognized_status_is_unknown_and_not_terminal() {
        let status = PaymentStatus::from_raw("PROCESSING");
        assert_eq!(status, PaymentStatus::Unknown);
        assert!(!status.is_terminal());
        assert_eq!(PaymentStatus::from_raw(""), PaymentStatus::Unknown);
    }

    #[test]
    fn terminal_statuses() {
        assert!(PaymentStatus::Success.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }

    #[test]
    fn display_uses_canonical_spelling() {
        assert_eq!(PaymentStatus::Success.to_string(), "SUCCESS");
        assert_eq!(PaymentStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn payment_id_trims_and_rejects_blank() {
        assert_eq!(PaymentId::new("  ws_CO_123 ").unwrap().as_str(), "ws_CO_123");
        assert_eq!(PaymentId::new("   "), Err(ValidationError::EmptyPaymentId));
        assert_eq!(PaymentId::new(""), Err(ValidationError::EmptyPaymentId));
    }

    #[test]
    fn payment_id_deserialize_rejects_blank() {
        let id: PaymentId = serde_json::from_str("\"pay-1\"").unwrap();
        assert_eq!(id.to_string(), "pay-1");
        assert!(serde_json::from_str::<PaymentId>("\"\"").is_err());
    }

    #[test]
    fn payment_handle_serializes_transparent_id() {
        let handle = PaymentHandle::new(PaymentId::new("pay-9").unwrap());
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json, serde_json::json!({"payment_id": "pay-9"}));
    }
}
