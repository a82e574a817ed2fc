//! Gateway client error types.

/// Errors from payment gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Gateway returned a non-2xx status.
    #[error("gateway {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not valid JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Initiation response carried no usable payment identifier.
    #[error("gateway {endpoint} response has no payment identifier")]
    MissingPaymentId {
        endpoint: String,
        /// Explanation the gateway returned alongside the missing id.
        message: Option<String>,
    },
    /// Status response carried no status field.
    #[error("gateway {endpoint} response has no status")]
    MissingStatus { endpoint: String },
    /// Failure reported by an in-process gateway.
    #[error("{0}")]
    Unavailable(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl GatewayError {
    /// The message the gateway itself supplied, if any.
    ///
    /// For API errors this is the `message` (or `error`) field of the
    /// response body; for a 2xx response without an id it is the message
    /// that came with it; for everything else it is `None`.
    pub fn upstream_message(&self) -> Option<String> {
        match self {
            Self::Api { body, .. } => crate::envelope::extract_message(body),
            Self::MissingPaymentId { message, .. } => message.clone(),
            Self::Unavailable(message) => Some(message.clone()),
            _ => None,
        }
    }
}
