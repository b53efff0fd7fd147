//! Request logging middleware.
//!
//! Every request gets a generated id and one completion line carrying the
//! method, matched route, status, and latency. The level follows the status
//! class so 4xx and 5xx responses stand out in the stream.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};
use uuid::Uuid;

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = Uuid::new_v4();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        error!(%request_id, %method, %path, status, latency_ms, "Request failed");
    } else if response.status().is_client_error() {
        warn!(%request_id, %method, %path, status, latency_ms, "Request rejected");
    } else {
        info!(%request_id, %method, %path, status, latency_ms, "Request completed");
    }

    response
}
