use diesel::prelude::*;
use diesel::r2d2::{ ConnectionManager, PooledConnection };

use crate::{
    config::database::PgPool,
    models::{ Employee, NewEmployee, NewReport, Report, UpdateReport },
    repositories::{
        page_offset,
        DataStore,
        EmployeeRepository,
        ReportRepository,
        Repositories,
        RepositoryError,
    },
    schema::{ employees, reports },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DataStore for PgStore {
    fn open(&self) -> Result<Box<dyn Repositories>, RepositoryError> {
        let conn = self.pool.get()?;
        Ok(Box::new(PgRepositories { conn }))
    }
}

/// Holds one pooled connection until dropped.
pub struct PgRepositories {
    conn: PooledConnection<ConnectionManager<PgConnection>>,
}

impl ReportRepository for PgRepositories {
    fn find_page(
        &mut self,
        page: i64,
        per_page: i64
    ) -> Result<Vec<(Report, Employee)>, RepositoryError> {
        let rows = reports::table
            .inner_join(employees::table)
            .select((Report::as_select(), Employee::as_select()))
            .order(reports::id.desc())
            .limit(per_page)
            .offset(page_offset(page, per_page))
            .load::<(Report, Employee)>(&mut *self.conn)?;

        Ok(rows)
    }

    fn count_all(&mut self) -> Result<i64, RepositoryError> {
        let total: i64 = reports::table.count().get_result(&mut *self.conn)?;
        Ok(total)
    }

    fn find_one(&mut self, report_id: i32) -> Result<Option<(Report, Employee)>, RepositoryError> {
        let row = reports::table
            .inner_join(employees::table)
            .filter(reports::id.eq(report_id))
            .select((Report::as_select(), Employee::as_select()))
            .first::<(Report, Employee)>(&mut *self.conn)
            .optional()?;

        Ok(row)
    }

    fn create(&mut self, report: NewReport) -> Result<Report, RepositoryError> {
        let created = diesel
            ::insert_into(reports::table)
            .values(&report)
            .returning(Report::as_returning())
            .get_result(&mut *self.conn)?;

        Ok(created)
    }

    fn update(&mut self, report_id: i32, changes: UpdateReport) -> Result<Report, RepositoryError> {
        let updated = diesel
            ::update(reports::table.find(report_id))
            .set(&changes)
            .returning(Report::as_returning())
            .get_result(&mut *self.conn)?;

        Ok(updated)
    }
}

impl EmployeeRepository for PgRepositories {
    fn find_by_code(&mut self, code: &str) -> Result<Option<Employee>, RepositoryError> {
        let employee = employees::table
            .filter(employees::code.eq(code))
            .filter(employees::delete_flag.eq(false))
            .select(Employee::as_select())
            .first(&mut *self.conn)
            .optional()?;

        Ok(employee)
    }

    fn count_employees(&mut self) -> Result<i64, RepositoryError> {
        let total: i64 = employees::table.count().get_result(&mut *self.conn)?;
        Ok(total)
    }

    fn create_employee(&mut self, employee: NewEmployee) -> Result<Employee, RepositoryError> {
        let created = diesel
            ::insert_into(employees::table)
            .values(&employee)
            .returning(Employee::as_returning())
            .get_result(&mut *self.conn)?;

        Ok(created)
    }
}
