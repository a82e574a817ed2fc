//! Gateway client and tracker configuration.
//!
//! Defaults point at a local stub gateway. Override via environment
//! variables or explicit construction.

use url::Url;
use zeroize::Zeroizing;

/// Default status path template; `{paymentId}` is substituted per query.
pub const DEFAULT_STATUS_PATH: &str = "/api/v1/payments/{paymentId}/status";

/// Default initiate path used when no checkout flow is bound.
pub const DEFAULT_INITIATE_PATH: &str = "/api/v1/payments/stk-push";

/// Configuration for connecting to the payment gateway.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway base URL.
    pub base_url: Url,
    /// Bearer token; `None` sends no authorization header.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Path that initiates a charge.
    pub initiate_path: String,
    /// Status path template containing `{paymentId}`.
    pub status_path: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("initiate_path", &self.initiate_path)
            .field("status_path", &self.status_path)
            .finish()
    }
}

impl GatewayConfig {
    /// Build a configuration with default paths and timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout_secs: 30,
            initiate_path: DEFAULT_INITIATE_PATH.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `STKPAY_GATEWAY_URL` (default: `http://127.0.0.1:8091`)
    /// - `STKPAY_API_TOKEN` (optional)
    /// - `STKPAY_TIMEOUT_SECS` (default: 30)
    /// - `STKPAY_INITIATE_PATH` (default: [`DEFAULT_INITIATE_PATH`])
    /// - `STKPAY_STATUS_PATH` (default: [`DEFAULT_STATUS_PATH`])
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("STKPAY_GATEWAY_URL", "http://127.0.0.1:8091")?;
        let status_path = std::env::var("STKPAY_STATUS_PATH")
            .unwrap_or_else(|_| DEFAULT_STATUS_PATH.to_string());
        if !status_path.contains("{paymentId}") {
            return Err(ConfigError::StatusPathTemplate(status_path));
        }
        Ok(Self {
            base_url,
            api_token: std::env::var("STKPAY_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            timeout_secs: std::env::var("STKPAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            initiate_path: std::env::var("STKPAY_INITIATE_PATH")
                .unwrap_or_else(|_| DEFAULT_INITIATE_PATH.to_string()),
            status_path,
        })
    }

    /// Create a configuration pointing to a local stub gateway (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        let url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        let mut config = Self::new(url);
        config.timeout_secs = 5;
        Ok(config)
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Override the initiate path.
    pub fn with_initiate_path(mut self, path: impl Into<String>) -> Self {
        self.initiate_path = path.into();
        self
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("status path '{0}' must contain the {{paymentId}} placeholder")]
    StatusPathTemplate(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}
