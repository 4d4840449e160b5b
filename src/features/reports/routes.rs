//! Report routes: public intake and listings, plus the admin moderation
//! surface mounted separately so the basic-auth gate can wrap it.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::{ClassificationService, ReportService};

/// Shared state for the report handlers
#[derive(Clone)]
pub struct ReportState {
    pub classification: Arc<ClassificationService>,
    pub reports: Arc<ReportService>,
}

pub fn routes(state: ReportState) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::submit_report))
        .route("/api/reports/{status}", get(handlers::list_reports))
        .with_state(state)
}

pub fn admin_routes(state: ReportState) -> Router {
    Router::new()
        .route(
            "/api/admin/reports/{id}/approve",
            post(handlers::approve_report),
        )
        .route("/api/admin/reports/{id}", delete(handlers::reject_report))
        .with_state(state)
}
