//! Shared helpers: in-process mock services on an ephemeral port

#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "test-token-123";

/// Serve `app` on 127.0.0.1 and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
