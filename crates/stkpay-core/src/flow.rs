//! # Checkout Flows
//!
//! Each signup wizard and subscription page charges through its own
//! product endpoint and sends the user somewhere different on success. A
//! [`CheckoutFlow`] captures exactly that difference; the polling logic is
//! shared.
//!
//! Catalogs are YAML documents:
//!
//! ```yaml
//! flows:
//!   - name: member-subscription
//!     initiate_path: /api/v1/subscriptions/member/stk-push
//!     success_redirect: /browse
//!     clear_session_on_success: false
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::outcome::Outcome;

/// One call site that charges through the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    /// Unique flow name (e.g. `"provider-signup"`).
    pub name: String,
    /// Gateway path that initiates the charge for this product.
    pub initiate_path: String,
    /// Client-side route to navigate to after a successful charge.
    pub success_redirect: String,
    /// Whether the signup session is cleared after success.
    #[serde(default)]
    pub clear_session_on_success: bool,
}

/// What the calling screen should do with an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FlowAction {
    /// Navigate away.
    Redirect {
        /// Target route.
        to: String,
        /// Whether to drop signup session state first.
        clear_session: bool,
    },
    /// Show the error with a retry button. Account state is preserved so the
    /// retry does not require re-registration.
    ShowRetry {
        /// User-facing message.
        message: String,
    },
    /// Show "check your messages" guidance; the charge may still land.
    ShowPendingGuidance {
        /// User-facing message.
        message: String,
    },
    /// Close the payment prompt without comment.
    Dismiss,
}

impl CheckoutFlow {
    /// Create a flow.
    pub fn new(
        name: impl Into<String>,
        initiate_path: impl Into<String>,
        success_redirect: impl Into<String>,
        clear_session_on_success: bool,
    ) -> Self {
        Self {
            name: name.into(),
            initiate_path: initiate_path.into(),
            success_redirect: success_redirect.into(),
            clear_session_on_success,
        }
    }

    /// Map a tracker outcome to the screen action for this flow.
    pub fn resolve(&self, outcome: &Outcome) -> FlowAction {
        match outcome {
            Outcome::Success => FlowAction::Redirect {
                to: self.success_redirect.clone(),
                clear_session: self.clear_session_on_success,
            },
            Outcome::Failed { .. } | Outcome::InitiationError { .. } => FlowAction::ShowRetry {
                message: outcome.user_message().to_string(),
            },
            Outcome::Timeout => FlowAction::ShowPendingGuidance {
                message: outcome.user_message().to_string(),
            },
            Outcome::CancelledByCaller => FlowAction::Dismiss,
        }
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    flows: Vec<CheckoutFlow>,
}

/// Named set of checkout flows.
#[derive(Debug, Clone, Default)]
pub struct FlowCatalog {
    flows: BTreeMap<String, CheckoutFlow>,
}

impl FlowCatalog {
    /// The four call sites shipped with the web client: two signup wizards
    /// and two subscription pages.
    pub fn builtin() -> Self {
        let flows = [
            CheckoutFlow::new(
                "provider-signup",
                "/api/v1/subscriptions/provider-signup/stk-push",
                "/provider/dashboard",
                true,
            ),
            CheckoutFlow::new(
                "member-signup",
                "/api/v1/subscriptions/member-signup/stk-push",
                "/browse",
                true,
            ),
            CheckoutFlow::new(
                "provider-subscription",
                "/api/v1/payments/stk-push",
                "/provider/dashboard",
                false,
            ),
            CheckoutFlow::new(
                "member-subscription",
                "/api/v1/payments/stk-push",
                "/browse",
                false,
            ),
        ];
        Self {
            flows: flows.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    /// Parse a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on malformed YAML, duplicate names, or an
    /// initiate path that is not absolute.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FlowError> {
        let doc: CatalogDocument = serde_yaml::from_str(yaml)?;
        let mut flows = BTreeMap::new();
        for flow in doc.flows {
            if !flow.initiate_path.starts_with('/') {
                return Err(FlowError::RelativePath {
                    name: flow.name,
                    path: flow.initiate_path,
                });
            }
            if flows.contains_key(&flow.name) {
                return Err(FlowError::DuplicateName(flow.name));
            }
            flows.insert(flow.name.clone(), flow);
        }
        Ok(Self { flows })
    }

    /// Look up a flow by name.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::UnknownFlow`] if no flow has that name.
    pub fn get(&self, name: &str) -> Result<&CheckoutFlow, FlowError> {
        self.flows
            .get(name)
            .ok_or_else(|| FlowError::UnknownFlow(name.to_string()))
    }

    /// Iterate flows in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CheckoutFlow> {
        self.flows.values()
    }

    /// Number of flows.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether the catalog has no flows.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
