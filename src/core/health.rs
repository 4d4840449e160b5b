use axum::{http::StatusCode, routing::get, Router};

/// Liveness probe, no auth and no body
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub fn routes() -> Router {
    Router::new().route("/health", get(health_check))
}
