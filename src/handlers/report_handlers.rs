use std::sync::Arc;

use axum::{
    extract::{ Path, Query, State },
    http::StatusCode,
    response::{ IntoResponse, Redirect, Response },
    Extension,
    Form,
};
use chrono::{ Local, NaiveDate };
use tracing::{ error, warn };

use crate::{
    dto::report_dtos::{
        page_links,
        DATE_FORMAT,
        ErrorContext,
        PageQuery,
        ReportDetail,
        ReportForm,
        ReportFormContext,
        ReportFormValues,
        ReportIndexContext,
        ReportRow,
        ReportShowContext,
        ReportView,
    },
    errors::{ ErrorMessage, HttpError, InfoMessage },
    middleware::{ auth::CurrentEmployee, session::Session },
    models::LoginEmployee,
    repositories::RepositoryError,
    services::report_service::ReportService,
    views::{ ERROR_UNKNOWN, REPORT_EDIT, REPORT_INDEX, REPORT_NEW, REPORT_SHOW },
    AppState,
};

const REPORTS_PATH: &str = "/reports";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn repository_error(e: RepositoryError) -> HttpError {
    error!("Report store failure: {}", e);
    HttpError::server_error(ErrorMessage::DatabaseError.to_string())
}

fn open_service(state: &AppState) -> Result<ReportService, HttpError> {
    ReportService::open(state.store.as_ref()).map_err(repository_error)
}

fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Generic error page. Missing reports and reports owned by someone else
/// both land here with the same status and text.
pub fn not_found_page(
    state: &AppState,
    login_employee: Option<LoginEmployee>
) -> Result<Response, HttpError> {
    error_page(state, login_employee, StatusCode::NOT_FOUND, ErrorMessage::NotFound)
}

pub fn forbidden_page(
    state: &AppState,
    login_employee: Option<LoginEmployee>
) -> Result<Response, HttpError> {
    error_page(state, login_employee, StatusCode::FORBIDDEN, ErrorMessage::InvalidFormToken)
}

fn error_page(
    state: &AppState,
    login_employee: Option<LoginEmployee>,
    status: StatusCode,
    message: ErrorMessage
) -> Result<Response, HttpError> {
    let html = state.views.render(ERROR_UNKNOWN, &ErrorContext {
        login_employee,
        message: message.to_string(),
    })?;

    Ok((status, html).into_response())
}

fn render_form(
    state: &AppState,
    template: &str,
    context: ReportFormContext
) -> Result<Response, HttpError> {
    Ok(state.views.render(template, &context)?.into_response())
}

/// Loads a report for editing. `None` when the id is malformed, unknown,
/// or the report belongs to another employee.
fn find_owned(
    service: &mut ReportService,
    raw_id: &str,
    employee: &LoginEmployee
) -> Result<Option<ReportView>, HttpError> {
    let Some(report_id) = parse_id(raw_id) else {
        return Ok(None);
    };

    let report = service.find_one(report_id).map_err(repository_error)?;

    Ok(
        report.filter(|report| {
            let owned = report.is_owned_by(employee);
            if !owned {
                warn!("Employee {} denied access to report {}", employee.id, report_id);
            }
            owned
        })
    )
}

fn apply_form(report: &mut ReportView, form: &ReportForm) {
    report.title = form.title();
    report.content = form.content();
    report.start_time = form.start_time();
    report.finish_time = form.finish_time();
}

/// GET /reports
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<PageQuery>
) -> Result<Response, HttpError> {
    let page = query.page();
    let per_page = state.config.app.rows_per_page;

    let (reports, reports_count) = {
        let mut service = open_service(&state)?;
        let reports = service.get_all_per_page(page, per_page).map_err(repository_error)?;
        let reports_count = service.count_all().map_err(repository_error)?;
        (reports, reports_count)
    };

    let context = ReportIndexContext {
        login_employee: session.login_employee().await,
        flash: session.take_flash().await,
        reports: reports.iter().map(ReportRow::from_view).collect(),
        reports_count,
        page,
        max_row: per_page,
        pages: page_links(reports_count, per_page, page),
    };

    Ok(state.views.render(REPORT_INDEX, &context)?.into_response())
}

/// GET /reports/new
pub async fn entry_new(
    State(state): State<Arc<AppState>>,
    session: Session
) -> Result<Response, HttpError> {
    let login_employee = session.login_employee().await;
    let token = session.issue_token().await;

    let report = ReportFormValues {
        report_date: today().format(DATE_FORMAT).to_string(),
        ..Default::default()
    };

    render_form(&state, REPORT_NEW, ReportFormContext {
        login_employee,
        token,
        action: REPORTS_PATH.to_string(),
        report,
        errors: Vec::new(),
    })
}

/// POST /reports
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentEmployee(employee)): Extension<CurrentEmployee>,
    Form(form): Form<ReportForm>
) -> Result<Response, HttpError> {
    if !session.verify_token(form.token.as_deref()).await {
        warn!("Rejected report creation by employee {}: bad form token", employee.id);
        return forbidden_page(&state, Some(employee));
    }

    let today = today();
    let mut report = ReportView::blank(employee.clone(), today);
    report.report_date = form.report_date_or(today);
    apply_form(&mut report, &form);

    let errors = open_service(&state)?.create(&mut report).map_err(repository_error)?;

    if !errors.is_empty() {
        let token = session.issue_token().await;
        return render_form(&state, REPORT_NEW, ReportFormContext {
            login_employee: Some(employee),
            token,
            action: REPORTS_PATH.to_string(),
            report: ReportFormValues::from_submission(&report, &form),
            errors,
        });
    }

    session.set_flash(InfoMessage::Registered.to_string()).await;

    Ok(Redirect::to(REPORTS_PATH).into_response())
}

/// GET /reports/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>
) -> Result<Response, HttpError> {
    let login_employee = session.login_employee().await;

    let report = match parse_id(&id) {
        Some(report_id) => open_service(&state)?.find_one(report_id).map_err(repository_error)?,
        None => None,
    };

    let Some(report) = report else {
        return not_found_page(&state, login_employee);
    };

    let can_edit = login_employee
        .as_ref()
        .is_some_and(|employee| report.is_owned_by(employee));

    let html = state.views.render(REPORT_SHOW, &ReportShowContext {
        login_employee,
        report: ReportDetail::from_view(&report),
        can_edit,
    })?;

    Ok(html.into_response())
}

/// GET /reports/{id}/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentEmployee(employee)): Extension<CurrentEmployee>,
    Path(id): Path<String>
) -> Result<Response, HttpError> {
    let report = find_owned(&mut open_service(&state)?, &id, &employee)?;

    let Some(report) = report else {
        return not_found_page(&state, Some(employee));
    };

    let token = session.issue_token().await;

    render_form(&state, REPORT_EDIT, ReportFormContext {
        login_employee: Some(employee),
        token,
        action: format!("{}/{}", REPORTS_PATH, report.id.unwrap_or_default()),
        report: ReportFormValues::from_view(&report),
        errors: Vec::new(),
    })
}

/// POST /reports/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentEmployee(employee)): Extension<CurrentEmployee>,
    Path(id): Path<String>,
    Form(form): Form<ReportForm>
) -> Result<Response, HttpError> {
    if !session.verify_token(form.token.as_deref()).await {
        warn!("Rejected update of report {} by employee {}: bad form token", id, employee.id);
        return forbidden_page(&state, Some(employee));
    }

    let (report, errors) = {
        let mut service = open_service(&state)?;

        let Some(mut report) = find_owned(&mut service, &id, &employee)? else {
            return not_found_page(&state, Some(employee));
        };

        report.report_date = form.report_date();
        apply_form(&mut report, &form);

        let errors = service.update(&mut report).map_err(repository_error)?;
        (report, errors)
    };

    if !errors.is_empty() {
        let token = session.issue_token().await;
        return render_form(&state, REPORT_EDIT, ReportFormContext {
            login_employee: Some(employee),
            token,
            action: format!("{}/{}", REPORTS_PATH, report.id.unwrap_or_default()),
            report: ReportFormValues::from_submission(&report, &form),
            errors,
        });
    }

    session.set_flash(InfoMessage::Updated.to_string()).await;

    Ok(Redirect::to(REPORTS_PATH).into_response())
}
