use chrono::{ NaiveDate, NaiveDateTime };
use diesel::prelude::*;
use serde::Serialize;

use crate::{ models::Employee, schema::reports };

#[derive(Queryable, Serialize, Debug, Selectable, Identifiable, Associations, Clone)]
#[diesel(belongs_to(Employee))]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Report {
    pub id: i32,
    pub employee_id: i32,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub start_time: NaiveDateTime,
    pub finish_time: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = reports)]
pub struct NewReport {
    pub employee_id: i32,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub start_time: NaiveDateTime,
    pub finish_time: NaiveDateTime,
}

// Owner and creation time are not part of the changeset.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = reports)]
pub struct UpdateReport {
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub updated_at: NaiveDateTime,
    pub start_time: NaiveDateTime,
    pub finish_time: NaiveDateTime,
}
