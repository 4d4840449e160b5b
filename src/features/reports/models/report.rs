use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::shared::llm::Category;

/// Moderation status of a report.
///
/// Persisted as the integer flag `is_useful` (0 = pending, 1 = approved).
/// There is no rejected state: rejection deletes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Approved,
}

impl ReportStatus {
    pub fn as_flag(self) -> i64 {
        match self {
            ReportStatus::Pending => 0,
            ReportStatus::Approved => 1,
        }
    }

    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            ReportStatus::Pending
        } else {
            ReportStatus::Approved
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Approved => write!(f, "approved"),
        }
    }
}

/// Database model for a persisted report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub image_id: i64,
    pub geo_location: String,
    pub image_data: Vec<u8>,
    pub llm_classification: Category,
    pub description: String,
    pub is_useful: i64,
    pub captured_by_userid: i64,
    pub created_at: NaiveDateTime,
}

impl Report {
    pub fn status(&self) -> ReportStatus {
        ReportStatus::from_flag(self.is_useful)
    }
}

/// Data for creating a new pending report
#[derive(Debug)]
pub struct CreateReport {
    pub geo_location: String,
    pub image_data: Vec<u8>,
    pub category: Category,
    pub reasoning: String,
    pub captured_by_userid: i64,
}
