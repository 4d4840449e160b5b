use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{
    ModerationResultDto, ReportResponseDto, SubmitReportResponseDto,
};
use crate::features::reports::models::{CreateReport, ReportStatus};
use crate::features::reports::routes::ReportState;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a geotagged field photo for classification.
///
/// Multipart fields: `image` (binary), `user_id` (integer), `geo_location`
/// (free-form text). Irrelevant images are acknowledged without being stored.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report stored as pending", body = ApiResponse<SubmitReportResponseDto>),
        (status = 200, description = "Image judged irrelevant, nothing stored", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Missing multipart field or unknown submitter"),
        (status = 502, description = "Vision model unreachable")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let mut image: Option<Vec<u8>> = None;
    let mut user_id: Option<i64> = None;
    let mut geo_location: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image: {}", e)))?;
                image = Some(bytes.to_vec());
            }
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read user_id: {}", e)))?;
                user_id = Some(text.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation("user_id must be an integer".to_string())
                })?);
            }
            Some("geo_location") => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read geo_location: {}", e))
                })?;
                geo_location = Some(text);
            }
            _ => {}
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("Multipart field 'image' is required".to_string()))?;
    let user_id = user_id
        .ok_or_else(|| AppError::Validation("Multipart field 'user_id' is required".to_string()))?;
    let geo_location = geo_location.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        AppError::Validation("Multipart field 'geo_location' is required".to_string())
    })?;

    let classification = state.classification.classify(&image).await?;

    if classification.category.is_irrelevant() {
        let ack = SubmitReportResponseDto {
            report_id: None,
            classification: classification.category,
            reasoning: classification.reasoning,
            stored: false,
        };
        return Ok((
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(ack),
                Some("Image is not relevant to mangrove monitoring; report was not stored".to_string()),
                None,
            )),
        ));
    }

    let report = state
        .reports
        .create_pending(CreateReport {
            geo_location,
            image_data: image,
            category: classification.category,
            reasoning: classification.reasoning.clone(),
            captured_by_userid: user_id,
        })
        .await?;

    let ack = SubmitReportResponseDto {
        report_id: Some(report.image_id),
        classification: classification.category,
        reasoning: classification.reasoning,
        stored: true,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ack),
            Some("Report submitted for review".to_string()),
            None,
        )),
    ))
}

/// List reports by moderation status
#[utoipa::path(
    get,
    path = "/api/reports/{status}",
    params(
        ("status" = ReportStatus, Path, description = "pending or approved")
    ),
    responses(
        (status = 200, description = "Reports listed", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown status segment")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Path(status): Path<ReportStatus>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.reports.list_by_status(status).await?;
    let total = reports.len() as i64;
    let items: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Approve a pending report and credit its submitter
#[utoipa::path(
    post,
    path = "/api/admin/reports/{id}/approve",
    params(
        ("id" = i64, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report approved", body = ApiResponse<ModerationResultDto>),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 404, description = "Report not found")
    ),
    tag = "moderation"
)]
pub async fn approve_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ModerationResultDto>>> {
    let outcome = state.reports.approve(id).await?;

    let message = match outcome.credited_userid {
        Some(userid) => format!("Report {} approved, credit awarded to user {}", id, userid),
        None => format!("Report {} was already approved", id),
    };

    Ok(Json(ApiResponse::success(
        Some(outcome.into()),
        Some(message),
        None,
    )))
}

/// Reject a pending report, deleting it permanently
#[utoipa::path(
    delete,
    path = "/api/admin/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report rejected and deleted"),
        (status = 401, description = "Missing or invalid admin credentials"),
        (status = 404, description = "Report not found")
    ),
    tag = "moderation"
)]
pub async fn reject_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state.reports.reject(id).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Report {} rejected and deleted", id)),
        None,
    )))
}
