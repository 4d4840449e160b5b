//! Field-report intake and moderation.
//!
//! | Method | Path                            | Description                          |
//! |--------|---------------------------------|--------------------------------------|
//! | POST   | /api/reports                    | Submit an image for classification   |
//! | GET    | /api/reports/{status}           | List pending or approved reports     |
//! | POST   | /api/admin/reports/{id}/approve | Approve a report, credit submitter   |
//! | DELETE | /api/admin/reports/{id}         | Reject (delete) a report             |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ClassificationService, ReportService};
