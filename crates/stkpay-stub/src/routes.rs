// SPDX-License-Identifier: BUSL-1.1
//! Route definitions for the gateway stub.
//!
//! Responses deserialize cleanly through `stkpay-client`'s envelope
//! handling (camelCase JSON, `data` wrappers).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use stkpay_core::MsisdnRules;
use uuid::Uuid;

use crate::store::{AppState, StubPayment, SuccessSpelling};

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/payments/stk-push", post(payments_stk_push))
        .route(
            "/api/v1/subscriptions/:product/stk-push",
            post(subscription_stk_push),
        )
        .route("/api/v1/payments/:id/status", get(payment_status))
        // Fallback: 501 Not Implemented
        .fallback(not_implemented)
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Validate the charged number and store a new payment.
fn create_payment(
    state: &AppState,
    body: &Value,
    product: Option<String>,
    spelling: SuccessSpelling,
) -> Result<String, Response> {
    let phone = body
        .get("phoneNumber")
        .and_then(Value::as_str)
        .unwrap_or("");
    if !MsisdnRules::kenya().is_valid(phone) {
        tracing::info!(phone, "rejecting STK push for malformed number");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid phone number"})),
        )
            .into_response());
    }

    let id = format!("ws_CO_{}", Uuid::new_v4().simple());
    state.payments().insert(
        id.clone(),
        StubPayment {
            msisdn: phone.to_string(),
            product,
            spelling,
            polls: 0,
            created_at: Utc::now(),
        },
    );
    tracing::info!(payment_id = %id, "STK push accepted");
    Ok(id)
}

async fn payments_stk_push(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    match create_payment(&state, &body, None, SuccessSpelling::Completed) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"data": {"data": {"paymentId": id}}})),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

async fn subscription_stk_push(
    State(state): State<AppState>,
    Path(product): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    match create_payment(&state, &body, Some(product.clone()), SuccessSpelling::Success) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"data": {"paymentId": id, "product": product}})),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

async fn payment_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let pending_polls = state.pending_polls();
    match state.payments().get_mut(&id) {
        Some(mut entry) => {
            let payment = entry.value_mut();
            payment.polls += 1;
            let status = payment.raw_status(pending_polls);
            Json(json!({
                "data": {
                    "paymentId": id,
                    "status": status,
                    "createdAt": payment.created_at.to_rfc3339(),
                }
            }))
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Payment not found"})),
        )
            .into_response(),
    }
}

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
