use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{ Deserialize, Serialize };

use crate::schema::employees;

#[derive(Queryable, Debug, Selectable, Identifiable, Clone)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Employee {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub password: String,
    pub admin_flag: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub delete_flag: bool,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub code: String,
    pub name: String,
    pub password: String,
    pub admin_flag: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub delete_flag: bool,
}

/// Snapshot of the logged-in employee carried by the session.
///
/// It is cloned into every request that needs it and never written back, so
/// a report action cannot mutate the identity it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEmployee {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub admin: bool,
}

impl From<&Employee> for LoginEmployee {
    fn from(employee: &Employee) -> Self {
        LoginEmployee {
            id: employee.id,
            code: employee.code.clone(),
            name: employee.name.clone(),
            admin: employee.admin_flag,
        }
    }
}
