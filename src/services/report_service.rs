use chrono::{ Local, NaiveDateTime };
use tracing::{ debug, info };

use crate::{
    dto::report_dtos::ReportView,
    models::{ NewReport, UpdateReport },
    repositories::{ DataStore, ReportRepository, Repositories, RepositoryError },
    services::report_validator,
};

/// Report operations for one controller action.
///
/// The service holds a single repository session (a pooled connection for
/// PostgreSQL) from `open` until it is dropped, so every exit path of an
/// action gives the connection back.
pub struct ReportService {
    repos: Box<dyn Repositories>,
}

impl ReportService {
    pub fn open(store: &dyn DataStore) -> Result<Self, RepositoryError> {
        Ok(Self { repos: store.open()? })
    }

    /// One page of reports, newest first.
    pub fn get_all_per_page(
        &mut self,
        page: i64,
        per_page: i64
    ) -> Result<Vec<ReportView>, RepositoryError> {
        let rows = self.repos.find_page(page, per_page)?;

        Ok(
            rows
                .into_iter()
                .map(|(report, employee)| ReportView::from_model(report, &employee))
                .collect()
        )
    }

    pub fn count_all(&mut self) -> Result<i64, RepositoryError> {
        self.repos.count_all()
    }

    pub fn find_one(&mut self, report_id: i32) -> Result<Option<ReportView>, RepositoryError> {
        Ok(
            self.repos
                .find_one(report_id)?
                .map(|(report, employee)| ReportView::from_model(report, &employee))
        )
    }

    /// Validates and inserts `report`. On success the assigned id and
    /// timestamps are written back into `report` and the returned list is
    /// empty; otherwise nothing is stored and the errors are returned.
    pub fn create(&mut self, report: &mut ReportView) -> Result<Vec<String>, RepositoryError> {
        trim_text(report);
        let errors = report_validator::validate(report);
        let (Some(report_date), Some(start_time), Some(finish_time), true) = (
            report.report_date,
            report.start_time,
            report.finish_time,
            errors.is_empty(),
        ) else {
            debug!("Rejected new report with {} validation error(s)", errors.len());
            return Ok(errors);
        };

        let now = now();
        let created = self.repos.create(NewReport {
            employee_id: report.employee.id,
            report_date,
            title: report.title.clone(),
            content: report.content.clone(),
            created_at: now,
            updated_at: now,
            start_time,
            finish_time,
        })?;

        info!("Report {} created by employee {}", created.id, created.employee_id);
        report.id = Some(created.id);
        report.created_at = Some(created.created_at);
        report.updated_at = Some(created.updated_at);

        Ok(Vec::new())
    }

    /// Validates and saves the editable fields of an already persisted report.
    pub fn update(&mut self, report: &mut ReportView) -> Result<Vec<String>, RepositoryError> {
        trim_text(report);
        let errors = report_validator::validate(report);
        let (Some(report_id), Some(report_date), Some(start_time), Some(finish_time), true) = (
            report.id,
            report.report_date,
            report.start_time,
            report.finish_time,
            errors.is_empty(),
        ) else {
            debug!("Rejected update of report {:?} with {} error(s)", report.id, errors.len());
            return Ok(errors);
        };

        let updated = self.repos.update(report_id, UpdateReport {
            report_date,
            title: report.title.clone(),
            content: report.content.clone(),
            updated_at: now(),
            start_time,
            finish_time,
        })?;

        info!("Report {} updated", updated.id);
        report.updated_at = Some(updated.updated_at);

        Ok(Vec::new())
    }
}

// Validation and storage must see the same text.
fn trim_text(report: &mut ReportView) {
    report.title = report.title.trim().to_string();
    report.content = report.content.trim().to_string();
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
