mod classification_service;
mod report_service;

pub use classification_service::{Classification, ClassificationService};
pub use report_service::{ApprovalOutcome, ReportService};
