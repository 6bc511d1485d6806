pub mod auth_dtos;
pub mod report_dtos;
