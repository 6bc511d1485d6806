use thiserror::Error;

use crate::models::{ Employee, NewEmployee, NewReport, Report, UpdateReport };

pub mod memory_repository;
pub mod pg_repository;

pub use memory_repository::MemoryStore;
pub use pg_repository::PgStore;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")] Diesel(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")] Pool(#[from] diesel::r2d2::PoolError),

    #[error("In-memory store lock was poisoned")]
    Poisoned,
}

/// Report persistence. Every read returns the owning employee alongside the row.
pub trait ReportRepository {
    fn find_page(
        &mut self,
        page: i64,
        per_page: i64
    ) -> Result<Vec<(Report, Employee)>, RepositoryError>;

    fn count_all(&mut self) -> Result<i64, RepositoryError>;

    fn find_one(&mut self, report_id: i32) -> Result<Option<(Report, Employee)>, RepositoryError>;

    fn create(&mut self, report: NewReport) -> Result<Report, RepositoryError>;

    fn update(&mut self, report_id: i32, changes: UpdateReport) -> Result<Report, RepositoryError>;
}

pub trait EmployeeRepository {
    /// Active (not soft-deleted) employee by login code.
    fn find_by_code(&mut self, code: &str) -> Result<Option<Employee>, RepositoryError>;

    fn count_employees(&mut self) -> Result<i64, RepositoryError>;

    fn create_employee(&mut self, employee: NewEmployee) -> Result<Employee, RepositoryError>;
}

/// One unit of work against a store. Dropping it releases the underlying
/// connection.
pub trait Repositories: ReportRepository + EmployeeRepository + Send {}

impl<T> Repositories for T where T: ReportRepository + EmployeeRepository + Send {}

pub trait DataStore: Send + Sync {
    fn open(&self) -> Result<Box<dyn Repositories>, RepositoryError>;
}

/// Rows to skip for `page`. Saturates instead of overflowing on huge pages.
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page.max(0))
}
