use std::borrow::Cow;

use chrono::{ NaiveDate, NaiveDateTime };
use validator::{ Validate, ValidationError, ValidationErrors };

use crate::{ dto::report_dtos::ReportView, errors::ErrorMessage };

pub const TITLE_MAX_LENGTH: u64 = 255;

// Order in which messages are reported; "__all__" carries struct-level checks.
const FIELD_ORDER: [&str; 6] = [
    "report_date",
    "title",
    "content",
    "start_time",
    "finish_time",
    "__all__",
];

#[derive(Debug, Validate)]
#[validate(schema(function = "validate_time_range", skip_on_field_errors = false))]
struct ReportCheck {
    #[validate(required(code = "report_date_required"))]
    report_date: Option<NaiveDate>,

    #[validate(
        length(min = 1, code = "title_required"),
        length(max = 255, code = "title_too_long")
    )]
    title: String,

    #[validate(length(min = 1, code = "content_required"))]
    content: String,

    #[validate(required(code = "start_time_required"))]
    start_time: Option<NaiveDateTime>,

    #[validate(required(code = "finish_time_required"))]
    finish_time: Option<NaiveDateTime>,
}

fn validate_time_range(check: &ReportCheck) -> Result<(), ValidationError> {
    match (check.start_time, check.finish_time) {
        (Some(start), Some(finish)) if finish < start =>
            Err(ValidationError::new("finish_before_start")),
        _ => Ok(()),
    }
}

fn message_for(code: &Cow<'static, str>) -> String {
    match code.as_ref() {
        "report_date_required" => ErrorMessage::ReportDateRequired.to_string(),
        "title_required" => ErrorMessage::TitleRequired.to_string(),
        "title_too_long" => ErrorMessage::TitleTooLong(TITLE_MAX_LENGTH).to_string(),
        "content_required" => ErrorMessage::ContentRequired.to_string(),
        "start_time_required" => ErrorMessage::StartTimeRequired.to_string(),
        "finish_time_required" => ErrorMessage::FinishTimeRequired.to_string(),
        "finish_before_start" => ErrorMessage::FinishBeforeStart.to_string(),
        other => other.to_string(),
    }
}

fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let field_errors = errors.field_errors();

    FIELD_ORDER.iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errors| errors.iter())
        .map(|error| message_for(&error.code))
        .collect()
}

/// Checks a report before it is persisted. An empty list means valid.
///
/// Blank titles/content count as missing. Dates and times are `None` when
/// the submitted text was blank or malformed, so a bad `yyyy-MM-ddTHH:mm`
/// value is reported here as a missing start or finish time.
pub fn validate(report: &ReportView) -> Vec<String> {
    let check = ReportCheck {
        report_date: report.report_date,
        title: report.title.trim().to_string(),
        content: report.content.trim().to_string(),
        start_time: report.start_time,
        finish_time: report.finish_time,
    };

    match check.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_messages(&errors),
    }
}
