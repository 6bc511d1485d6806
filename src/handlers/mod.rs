pub mod auth_handlers;
pub mod general_handlers;
pub mod report_handlers;
