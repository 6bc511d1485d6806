use chrono::{ NaiveDate, NaiveDateTime };
use serde::{ Deserialize, Serialize };

use crate::models::{ Employee, LoginEmployee, Report };

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page, 1 when absent or not a positive integer.
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

/// Submitted report form. Only the fields below are read; anything else the
/// client sends (an owner id, a report id) is ignored.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ReportForm {
    #[serde(rename = "_token")]
    pub token: Option<String>,
    pub report_date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
}

impl ReportForm {
    /// Date for a new report: today when left blank.
    pub fn report_date_or(&self, today: NaiveDate) -> Option<NaiveDate> {
        match non_blank(&self.report_date) {
            None => Some(today),
            Some(raw) => parse_date(raw),
        }
    }

    /// Date for an existing report: blank is not replaced.
    pub fn report_date(&self) -> Option<NaiveDate> {
        non_blank(&self.report_date).and_then(parse_date)
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        non_blank(&self.start_time).and_then(parse_date_time)
    }

    pub fn finish_time(&self) -> Option<NaiveDateTime> {
        non_blank(&self.finish_time).and_then(parse_date_time)
    }

    /// Title as stored: surrounding whitespace removed.
    pub fn title(&self) -> String {
        self.title.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    pub fn content(&self) -> String {
        self.content.as_deref().map(str::trim).unwrap_or_default().to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT).ok()
}

/// A report as the service and controller work with it: `id` is `None`
/// until persisted, and the date/time fields are `None` when the submitted
/// text was blank or malformed.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub id: Option<i32>,
    pub employee: LoginEmployee,
    pub report_date: Option<NaiveDate>,
    pub title: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub start_time: Option<NaiveDateTime>,
    pub finish_time: Option<NaiveDateTime>,
}

impl ReportView {
    pub fn blank(employee: LoginEmployee, today: NaiveDate) -> Self {
        Self {
            id: None,
            employee,
            report_date: Some(today),
            title: String::new(),
            content: String::new(),
            created_at: None,
            updated_at: None,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn from_model(report: Report, employee: &Employee) -> Self {
        Self {
            id: Some(report.id),
            employee: LoginEmployee::from(employee),
            report_date: Some(report.report_date),
            title: report.title,
            content: report.content,
            created_at: Some(report.created_at),
            updated_at: Some(report.updated_at),
            start_time: Some(report.start_time),
            finish_time: Some(report.finish_time),
        }
    }

    pub fn is_owned_by(&self, employee: &LoginEmployee) -> bool {
        self.employee.id == employee.id
    }
}

/// Field values echoed back into a form, as strings, so a rejected
/// submission shows exactly what was typed.
#[derive(Serialize, Debug, Default, Clone)]
pub struct ReportFormValues {
    pub id: Option<i32>,
    pub report_date: String,
    pub title: String,
    pub content: String,
    pub start_time: String,
    pub finish_time: String,
}

impl ReportFormValues {
    pub fn from_view(report: &ReportView) -> Self {
        Self {
            id: report.id,
            report_date: report.report_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            title: report.title.clone(),
            content: report.content.clone(),
            start_time: report.start_time
                .map(|time| time.format(DATE_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            finish_time: report.finish_time
                .map(|time| time.format(DATE_TIME_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    /// Parsed values where parsing succeeded, raw submitted text otherwise.
    pub fn from_submission(report: &ReportView, form: &ReportForm) -> Self {
        let parsed = Self::from_view(report);
        let raw = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            report_date: if report.report_date.is_some() {
                parsed.report_date
            } else {
                raw(&form.report_date)
            },
            start_time: if report.start_time.is_some() {
                parsed.start_time
            } else {
                raw(&form.start_time)
            },
            finish_time: if report.finish_time.is_some() {
                parsed.finish_time
            } else {
                raw(&form.finish_time)
            },
            ..parsed
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ReportRow {
    pub id: i32,
    pub employee_name: String,
    pub report_date: String,
    pub title: String,
}

impl ReportRow {
    pub fn from_view(report: &ReportView) -> Self {
        Self {
            id: report.id.unwrap_or_default(),
            employee_name: report.employee.name.clone(),
            report_date: report.report_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            title: report.title.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PageLink {
    pub number: i64,
    pub current: bool,
}

pub fn page_links(total: i64, per_page: i64, current: i64) -> Vec<PageLink> {
    let pages = if per_page <= 0 { 1 } else { ((total + per_page - 1) / per_page).max(1) };

    (1..=pages)
        .map(|number| PageLink { number, current: number == current })
        .collect()
}

#[derive(Serialize, Debug)]
pub struct ReportIndexContext {
    pub login_employee: Option<LoginEmployee>,
    pub flash: Option<String>,
    pub reports: Vec<ReportRow>,
    pub reports_count: i64,
    pub page: i64,
    pub max_row: i64,
    pub pages: Vec<PageLink>,
}

#[derive(Serialize, Debug)]
pub struct ReportFormContext {
    pub login_employee: Option<LoginEmployee>,
    pub token: String,
    pub action: String,
    pub report: ReportFormValues,
    pub errors: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ReportDetail {
    pub id: i32,
    pub employee_name: String,
    pub report_date: String,
    pub title: String,
    pub content: String,
    pub start_time: String,
    pub finish_time: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ReportDetail {
    pub fn from_view(report: &ReportView) -> Self {
        let display = |time: Option<NaiveDateTime>| {
            time.map(|value| value.format(DISPLAY_DATE_TIME_FORMAT).to_string()).unwrap_or_default()
        };

        Self {
            id: report.id.unwrap_or_default(),
            employee_name: report.employee.name.clone(),
            report_date: report.report_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            title: report.title.clone(),
            content: report.content.clone(),
            start_time: display(report.start_time),
            finish_time: display(report.finish_time),
            created_at: display(report.created_at),
            updated_at: display(report.updated_at),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ReportShowContext {
    pub login_employee: Option<LoginEmployee>,
    pub report: ReportDetail,
    pub can_edit: bool,
}

#[derive(Serialize, Debug)]
pub struct ErrorContext {
    pub login_employee: Option<LoginEmployee>,
    pub message: String,
}
