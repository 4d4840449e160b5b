pub mod report_handler;

pub use report_handler::{approve_report, list_reports, reject_report, submit_report};
