use base64::prelude::*;
use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::reports::models::{Report, ReportStatus};
use crate::features::reports::services::ApprovalOutcome;
use crate::shared::llm::Category;

/// Acknowledgement for a submitted image.
///
/// `stored` is false when the classifier deemed the image irrelevant: the
/// submission is acknowledged but nothing was persisted and `report_id` is
/// absent.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitReportResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<i64>,
    pub classification: Category,
    pub reasoning: String,
    pub stored: bool,
}

/// Public view of a persisted report, image bytes base64-encoded
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponseDto {
    pub image_id: i64,
    pub geo_location: String,
    pub image_data: String,
    pub classification: Category,
    pub description: String,
    pub status: ReportStatus,
    pub captured_by_userid: i64,
    pub created_at: NaiveDateTime,
}

impl From<Report> for ReportResponseDto {
    fn from(report: Report) -> Self {
        let status = report.status();
        Self {
            image_id: report.image_id,
            geo_location: report.geo_location,
            image_data: BASE64_STANDARD.encode(&report.image_data),
            classification: report.llm_classification,
            description: report.description,
            status,
            captured_by_userid: report.captured_by_userid,
            created_at: report.created_at,
        }
    }
}

/// Result of an admin approval.
///
/// `credited_userid` is absent when the report was already approved and no
/// further credit was awarded.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationResultDto {
    pub report_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credited_userid: Option<i64>,
}

impl From<ApprovalOutcome> for ModerationResultDto {
    fn from(outcome: ApprovalOutcome) -> Self {
        Self {
            report_id: outcome.report_id,
            credited_userid: outcome.credited_userid,
        }
    }
}
