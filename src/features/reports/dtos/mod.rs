mod report_dto;

pub use report_dto::{ModerationResultDto, ReportResponseDto, SubmitReportResponseDto};
