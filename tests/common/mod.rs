//! Shared helpers for endpoint tests.

use pagelens::server::{router, AppState};
use std::net::SocketAddr;

/// Spawn the service on an ephemeral local port and return its address.
pub async fn spawn_app(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("test server");
    });

    addr
}
