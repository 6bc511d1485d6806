use std::sync::{ Arc, Mutex, MutexGuard };

use crate::{
    models::{ Employee, NewEmployee, NewReport, Report, UpdateReport },
    repositories::{
        page_offset,
        DataStore,
        EmployeeRepository,
        ReportRepository,
        Repositories,
        RepositoryError,
    },
};

#[derive(Default)]
struct MemoryTables {
    employees: Vec<Employee>,
    reports: Vec<Report>,
}

/// Process-local store used by `REPORT_STORE=memory` and by the test suite.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored report, in insertion order.
    pub fn reports(&self) -> Vec<Report> {
        self.tables
            .lock()
            .map(|tables| tables.reports.clone())
            .unwrap_or_default()
    }
}

impl DataStore for MemoryStore {
    fn open(&self) -> Result<Box<dyn Repositories>, RepositoryError> {
        Ok(Box::new(MemoryRepositories { tables: self.tables.clone() }))
    }
}

pub struct MemoryRepositories {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryRepositories {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryTables>, RepositoryError> {
        self.tables.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

fn with_owner(tables: &MemoryTables, report: &Report) -> Option<(Report, Employee)> {
    tables.employees
        .iter()
        .find(|employee| employee.id == report.employee_id)
        .map(|employee| (report.clone(), employee.clone()))
}

impl ReportRepository for MemoryRepositories {
    fn find_page(
        &mut self,
        page: i64,
        per_page: i64
    ) -> Result<Vec<(Report, Employee)>, RepositoryError> {
        let tables = self.lock()?;

        let rows = tables.reports
            .iter()
            .rev()
            .skip(page_offset(page, per_page) as usize)
            .take(per_page.max(0) as usize)
            .filter_map(|report| with_owner(&tables, report))
            .collect();

        Ok(rows)
    }

    fn count_all(&mut self) -> Result<i64, RepositoryError> {
        Ok(self.lock()?.reports.len() as i64)
    }

    fn find_one(&mut self, report_id: i32) -> Result<Option<(Report, Employee)>, RepositoryError> {
        let tables = self.lock()?;

        Ok(
            tables.reports
                .iter()
                .find(|report| report.id == report_id)
                .and_then(|report| with_owner(&tables, report))
        )
    }

    fn create(&mut self, report: NewReport) -> Result<Report, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.employees.iter().any(|employee| employee.id == report.employee_id) {
            return Err(RepositoryError::Diesel(diesel::result::Error::NotFound));
        }

        let next_id =
            tables.reports
                .iter()
                .map(|existing| existing.id)
                .max()
                .unwrap_or(0) + 1;

        let created = Report {
            id: next_id,
            employee_id: report.employee_id,
            report_date: report.report_date,
            title: report.title,
            content: report.content,
            created_at: report.created_at,
            updated_at: report.updated_at,
            start_time: report.start_time,
            finish_time: report.finish_time,
        };
        tables.reports.push(created.clone());

        Ok(created)
    }

    fn update(&mut self, report_id: i32, changes: UpdateReport) -> Result<Report, RepositoryError> {
        let mut tables = self.lock()?;

        let report = tables.reports
            .iter_mut()
            .find(|report| report.id == report_id)
            .ok_or(RepositoryError::Diesel(diesel::result::Error::NotFound))?;

        report.report_date = changes.report_date;
        report.title = changes.title;
        report.content = changes.content;
        report.updated_at = changes.updated_at;
        report.start_time = changes.start_time;
        report.finish_time = changes.finish_time;

        Ok(report.clone())
    }
}

impl EmployeeRepository for MemoryRepositories {
    fn find_by_code(&mut self, code: &str) -> Result<Option<Employee>, RepositoryError> {
        let tables = self.lock()?;

        Ok(
            tables.employees
                .iter()
                .find(|employee| employee.code == code && !employee.delete_flag)
                .cloned()
        )
    }

    fn count_employees(&mut self) -> Result<i64, RepositoryError> {
        Ok(self.lock()?.employees.len() as i64)
    }

    fn create_employee(&mut self, employee: NewEmployee) -> Result<Employee, RepositoryError> {
        let mut tables = self.lock()?;

        let created = Employee {
            id: (tables.employees.len() as i32) + 1,
            code: employee.code,
            name: employee.name,
            password: employee.password,
            admin_flag: employee.admin_flag,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
            delete_flag: employee.delete_flag,
        };
        tables.employees.push(created.clone());

        Ok(created)
    }
}
