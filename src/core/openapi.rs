use utoipa::{Modify, OpenApi};

use crate::features::reports::models::ReportStatus;
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::llm::Category;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::user_handler::register_user,
        users_handlers::user_handler::login_user,
        users_handlers::user_handler::list_users,
        // Reports
        reports_handlers::report_handler::submit_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::approve_report,
        reports_handlers::report_handler::reject_report,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Category,
            // Users
            users_dtos::RegisterUserDto,
            users_dtos::LoginDto,
            users_dtos::UserCreatedDto,
            users_dtos::LoginResponseDto,
            users_dtos::UserSummaryDto,
            ApiResponse<users_dtos::UserCreatedDto>,
            ApiResponse<users_dtos::LoginResponseDto>,
            ApiResponse<Vec<users_dtos::UserSummaryDto>>,
            // Reports
            ReportStatus,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ModerationResultDto,
            ApiResponse<reports_dtos::SubmitReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ModerationResultDto>,
        )
    ),
    tags(
        (name = "users", description = "Registration, login and credit scores"),
        (name = "reports", description = "Report submission and public listings"),
        (name = "moderation", description = "Admin approval / rejection of pending reports"),
    ),
    info(
        title = "Mangrove Watch API",
        version = "0.1.0",
        description = "Field-report intake and moderation API for mangrove incidents",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
