//! # HTTP Gateway Adapter
//!
//! Production implementation of [`PaymentGateway`] over `reqwest`.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `{initiate_path}` | Initiate STK push, body `{"phoneNumber": "2547..."}` |
//! | GET    | `{status_path}` with `{paymentId}` substituted | Query status |
//!
//! The initiate path differs per product; bind it with
//! [`HttpGateway::for_flow`]. Retries are NOT built into the adapter:
//! initiation must not be repeated automatically, and the tracker's poll
//! loop already re-queries status.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;
use serde_json::{json, Value};
use stkpay_core::{CheckoutFlow, Msisdn, PaymentHandle, PaymentId, PaymentStatus};

use crate::config::{ConfigError, GatewayConfig};
use crate::envelope;
use crate::error::GatewayError;
use crate::gateway::PaymentGateway;

/// HTTP client for the mobile-money gateway.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    initiate_path: String,
    status_path: String,
}

impl HttpGateway {
    /// Create a new HTTP gateway from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                if let Some(token) = config.api_token.as_ref() {
                    headers.insert(
                        reqwest::header::AUTHORIZATION,
                        reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                            .map_err(|_| {
                                GatewayError::Config(ConfigError::InvalidValue {
                                    var: "STKPAY_API_TOKEN".into(),
                                    reason: "invalid API token characters".into(),
                                })
                            })?,
                    );
                }
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| GatewayError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url,
            initiate_path: config.initiate_path,
            status_path: config.status_path,
        })
    }

    /// Create a gateway bound to a checkout flow's initiate path.
    pub fn for_flow(config: GatewayConfig, flow: &CheckoutFlow) -> Result<Self, GatewayError> {
        Self::new(config.with_initiate_path(flow.initiate_path.clone()))
    }

    /// Path used for initiation.
    pub fn initiate_path(&self) -> &str {
        &self.initiate_path
    }

    fn initiate_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.initiate_path
        )
    }

    /// Expand the status path template with the id as one percent-encoded
    /// path segment.
    fn status_url(&self, payment_id: &PaymentId) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                GatewayError::Config(ConfigError::InvalidUrl(
                    self.base_url.to_string(),
                    "URL cannot carry a path".into(),
                ))
            })?;
            segments.pop_if_empty();
            for part in self.status_path.split('/').filter(|p| !p.is_empty()) {
                segments.push(&part.replace("{paymentId}", payment_id.as_str()));
            }
        }
        Ok(url)
    }

    /// Send a request and decode a JSON body, mapping failures consistently.
    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<Value, GatewayError> {
        let resp = request.send().await.map_err(|e| GatewayError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(GatewayError::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| GatewayError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn initiate_charge(&self, msisdn: &Msisdn) -> Result<PaymentHandle, GatewayError> {
        let endpoint = format!("POST {}", self.initiate_path);
        let url = self.initiate_url();
        let body = json!({ "phoneNumber": msisdn.as_str() });

        tracing::debug!(endpoint = %endpoint, "initiating STK push");
        let value = self
            .send_json(self.client.post(&url).json(&body), &endpoint)
            .await?;

        match envelope::extract_payment_id(&value) {
            Some(payment_id) => Ok(PaymentHandle::new(payment_id)),
            None => Err(GatewayError::MissingPaymentId {
                endpoint,
                message: envelope::message_of(&value),
            }),
        }
    }

    async fn payment_status(
        &self,
        payment_id: &PaymentId,
    ) -> Result<PaymentStatus, GatewayError> {
        let endpoint = format!("GET {}", self.status_path);
        let url = self.status_url(payment_id)?;

        let value = self.send_json(self.client.get(url), &endpoint).await?;
        envelope::extract_status(&value).ok_or(GatewayError::MissingStatus { endpoint })
    }

    fn gateway_name(&self) -> &str {
        "HttpGateway"
    }
}
