use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::shared::constants::CREDIT_AWARD_PER_APPROVAL;

/// Outcome of an approval attempt.
///
/// `credited_userid` is `None` when the report was already approved: the
/// call succeeds idempotently but awards no second credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub report_id: i64,
    pub credited_userid: Option<i64>,
}

/// Moderation state machine over persisted reports.
///
/// Lifecycle: created pending, then either approved (status flip plus a
/// credit award to the submitter, in one transaction) or rejected
/// (deleted). Irrelevant classifications never reach this service.
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new report in the pending state.
    ///
    /// Callers must not pass an irrelevant category; that submission is
    /// discarded upstream without touching storage.
    pub async fn create_pending(&self, input: CreateReport) -> Result<Report> {
        debug_assert!(!input.category.is_irrelevant());

        let report: Report = sqlx::query_as(
            r#"
            INSERT INTO reports (geo_location, image_data, llm_classification, description, is_useful, captured_by_userid)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(&input.geo_location)
        .bind(&input.image_data)
        .bind(input.category)
        .bind(&input.reasoning)
        .bind(input.captured_by_userid)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                AppError::BadRequest(format!(
                    "Unknown submitter: user {} does not exist",
                    input.captured_by_userid
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(
            "Report created: id={}, category={}, submitter={}",
            report.image_id,
            report.llm_classification,
            report.captured_by_userid
        );

        Ok(report)
    }

    /// Approve a report and credit its submitter.
    ///
    /// The status flip and the credit increment commit together or not at
    /// all. The conditional UPDATE makes concurrent approvals of the same
    /// id award exactly one credit: whichever transaction flips the flag
    /// credits the user, the other sees zero affected rows and returns the
    /// idempotent outcome.
    pub async fn approve(&self, report_id: i64) -> Result<ApprovalOutcome> {
        let mut tx = self.pool.begin().await?;

        // Flip pending -> approved, learning the submitter in the same statement
        let submitter: Option<i64> = sqlx::query_scalar(
            "UPDATE reports SET is_useful = 1 WHERE image_id = ? AND is_useful = 0 RETURNING captured_by_userid",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(userid) = submitter else {
            // Zero rows: either already approved or the report no longer exists
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT is_useful FROM reports WHERE image_id = ?")
                    .bind(report_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return match existing {
                Some(_) => {
                    tracing::info!("Report {} already approved, no credit awarded", report_id);
                    Ok(ApprovalOutcome {
                        report_id,
                        credited_userid: None,
                    })
                }
                None => Err(AppError::NotFound(format!(
                    "Report {} not found",
                    report_id
                ))),
            };
        };

        sqlx::query(
            "UPDATE users SET credit_score = COALESCE(credit_score, 0) + ? WHERE userid = ?",
        )
        .bind(CREDIT_AWARD_PER_APPROVAL)
        .bind(userid)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Report {} approved, {} credit awarded to user {}",
            report_id,
            CREDIT_AWARD_PER_APPROVAL,
            userid
        );

        Ok(ApprovalOutcome {
            report_id,
            credited_userid: Some(userid),
        })
    }

    /// Reject a report by deleting it. No credit or status side effect.
    pub async fn reject(&self, report_id: i64) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM reports WHERE image_id = ?")
            .bind(report_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Report {} not found",
                report_id
            )));
        }

        tracing::info!("Report {} rejected and deleted", report_id);
        Ok(())
    }

    /// All reports with the given status, in storage order.
    pub async fn list_by_status(&self, status: ReportStatus) -> Result<Vec<Report>> {
        let reports: Vec<Report> =
            sqlx::query_as("SELECT * FROM reports WHERE is_useful = ? ORDER BY image_id")
                .bind(status.as_flag())
                .fetch_all(&self.pool)
                .await?;

        Ok(reports)
    }

    /// Fetch one report by id
    pub async fn get(&self, report_id: i64) -> Result<Report> {
        sqlx::query_as("SELECT * FROM reports WHERE image_id = ?")
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::Category;
    use crate::shared::test_helpers::{create_test_pool, credit_score_of, seed_user};

    fn create_input(userid: i64) -> CreateReport {
        CreateReport {
            geo_location: "12.9716,77.5946".to_string(),
            image_data: vec![0xFF, 0xD8, 0xFF],
            category: Category::Pollution,
            reasoning: "oil slick near the roots".to_string(),
            captured_by_userid: userid,
        }
    }

    #[tokio::test]
    async fn test_create_pending_defaults_to_pending_status() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;

        let report = service.create_pending(create_input(userid)).await.unwrap();

        assert_eq!(report.status(), ReportStatus::Pending);
        assert_eq!(report.llm_classification, Category::Pollution);
        assert_eq!(report.captured_by_userid, userid);
    }

    #[tokio::test]
    async fn test_create_pending_unknown_user_is_bad_request() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool);

        let err = service.create_pending(create_input(4242)).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_approve_flips_status_and_awards_credit_together() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;
        sqlx::query("UPDATE users SET credit_score = 3 WHERE userid = ?")
            .bind(userid)
            .execute(&pool)
            .await
            .unwrap();
        let report = service.create_pending(create_input(userid)).await.unwrap();

        let outcome = service.approve(report.image_id).await.unwrap();

        assert_eq!(outcome.credited_userid, Some(userid));
        assert_eq!(service.get(report.image_id).await.unwrap().status(), ReportStatus::Approved);
        assert_eq!(credit_score_of(&pool, userid).await, 4);
    }

    #[tokio::test]
    async fn test_approve_treats_null_credit_as_zero() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;
        let report = service.create_pending(create_input(userid)).await.unwrap();

        service.approve(report.image_id).await.unwrap();

        assert_eq!(credit_score_of(&pool, userid).await, 1);
    }

    #[tokio::test]
    async fn test_double_approval_awards_single_credit() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;
        let report = service.create_pending(create_input(userid)).await.unwrap();

        let first = service.approve(report.image_id).await.unwrap();
        let second = service.approve(report.image_id).await.unwrap();

        assert_eq!(first.credited_userid, Some(userid));
        assert_eq!(second.credited_userid, None);
        assert_eq!(credit_score_of(&pool, userid).await, 1);
    }

    #[tokio::test]
    async fn test_approve_after_reject_is_not_found() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;
        let report = service.create_pending(create_input(userid)).await.unwrap();

        service.reject(report.image_id).await.unwrap();
        let err = service.approve(report.image_id).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(credit_score_of(&pool, userid).await, 0);
    }

    #[tokio::test]
    async fn test_approve_missing_report_is_not_found() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool);

        let err = service.approve(999).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reject_deletes_report() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;
        let report = service.create_pending(create_input(userid)).await.unwrap();

        service.reject(report.image_id).await.unwrap();

        let err = service.get(report.image_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // no credit side effect
        assert_eq!(credit_score_of(&pool, userid).await, 0);
    }

    #[tokio::test]
    async fn test_reject_missing_report_is_not_found() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool);

        let err = service.reject(999).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listings_partition_all_reports() {
        let pool = create_test_pool().await;
        let service = ReportService::new(pool.clone());
        let userid = seed_user(&pool, "Asha", "9990001111").await;

        let a = service.create_pending(create_input(userid)).await.unwrap();
        let b = service.create_pending(create_input(userid)).await.unwrap();
        let c = service.create_pending(create_input(userid)).await.unwrap();
        service.approve(b.image_id).await.unwrap();

        let pending = service.list_by_status(ReportStatus::Pending).await.unwrap();
        let approved = service.list_by_status(ReportStatus::Approved).await.unwrap();

        let pending_ids: Vec<i64> = pending.iter().map(|r| r.image_id).collect();
        let approved_ids: Vec<i64> = approved.iter().map(|r| r.image_id).collect();
        assert_eq!(pending_ids, vec![a.image_id, c.image_id]);
        assert_eq!(approved_ids, vec![b.image_id]);
        assert!(pending_ids.iter().all(|id| !approved_ids.contains(id)));
    }
}
