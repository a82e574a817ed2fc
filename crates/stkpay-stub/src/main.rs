// SPDX-License-Identifier: BUSL-1.1
//! STK push gateway stub server: standalone development server.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("STKPAY_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8091);
    let pending_polls: u32 = std::env::var("STKPAY_STUB_PENDING_POLLS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(stkpay_stub::store::DEFAULT_PENDING_POLLS);

    let state = stkpay_stub::AppState::with_pending_polls(pending_polls);
    let app = stkpay_stub::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(pending_polls, "stkpay-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
