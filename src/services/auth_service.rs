use std::env;

use chrono::Local;
use tracing::{ info, warn };

use crate::{
    models::{ LoginEmployee, NewEmployee },
    repositories::{ DataStore, EmployeeRepository, RepositoryError },
    utils::password,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Employee code or password is incorrect")]
    WrongCredentials,

    #[error(transparent)] Repository(#[from] RepositoryError),

    #[error("Password hash error")]
    Hash,
}

pub struct AuthService;

impl AuthService {
    /// Looks up an active employee by code and checks the password.
    pub fn authenticate(
        store: &dyn DataStore,
        code: &str,
        password_input: &str
    ) -> Result<LoginEmployee, AuthError> {
        let mut repos = store.open()?;

        let employee = repos.find_by_code(code.trim())?.ok_or(AuthError::WrongCredentials)?;

        match password::compare(password_input, &employee.password) {
            Ok(true) => Ok(LoginEmployee::from(&employee)),
            Ok(false) => Err(AuthError::WrongCredentials),
            Err(_) => Err(AuthError::Hash),
        }
    }

    /// Registers an employee with a freshly hashed password.
    pub fn register(
        store: &dyn DataStore,
        code: &str,
        name: &str,
        plain_password: &str,
        admin: bool
    ) -> Result<LoginEmployee, AuthError> {
        let hashed_password = password::hash(plain_password).map_err(|_| AuthError::Hash)?;
        let now = Local::now().naive_local();

        let mut repos = store.open()?;
        let employee = repos.create_employee(NewEmployee {
            code: code.to_string(),
            name: name.to_string(),
            password: hashed_password,
            admin_flag: admin,
            created_at: now,
            updated_at: now,
            delete_flag: false,
        })?;

        Ok(LoginEmployee::from(&employee))
    }

    /// Creates the first account from INITIAL_EMPLOYEE_* variables when the
    /// employee table is empty. Skipped when no password is configured.
    pub fn seed_initial_employee(store: &dyn DataStore) -> Result<(), AuthError> {
        let existing = store.open()?.count_employees()?;

        if existing > 0 {
            info!("Employees already exist. Skipping initial employee creation.");
            return Ok(());
        }

        let Ok(initial_password) = env::var("INITIAL_EMPLOYEE_PASSWORD") else {
            warn!("No employees exist and INITIAL_EMPLOYEE_PASSWORD is not set; nobody can log in");
            return Ok(());
        };
        let code = env::var("INITIAL_EMPLOYEE_CODE").unwrap_or_else(|_| "admin".to_string());
        let name = env
            ::var("INITIAL_EMPLOYEE_NAME")
            .unwrap_or_else(|_| "System Administrator".to_string());

        let employee = Self::register(store, &code, &name, &initial_password, true)?;
        info!("Initial employee '{}' created with id {}", employee.code, employee.id);

        Ok(())
    }
}
