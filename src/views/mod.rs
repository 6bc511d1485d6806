use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::error;

use crate::errors::{ ErrorMessage, HttpError };

pub const REPORT_INDEX: &str = "reports/index";
pub const REPORT_NEW: &str = "reports/new";
pub const REPORT_EDIT: &str = "reports/edit";
pub const REPORT_SHOW: &str = "reports/show";
pub const ERROR_UNKNOWN: &str = "error/unknown";
pub const LOGIN: &str = "login";
pub const LOGOUT: &str = "logout";

/// Page templates compiled into the binary.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();

        registry.register_partial("header", include_str!("templates/partials/header.hbs"))?;
        registry.register_partial("footer", include_str!("templates/partials/footer.hbs"))?;
        registry.register_partial("report_form", include_str!("templates/partials/report_form.hbs"))?;

        registry.register_template_string(REPORT_INDEX, include_str!("templates/reports/index.hbs"))?;
        registry.register_template_string(REPORT_NEW, include_str!("templates/reports/new.hbs"))?;
        registry.register_template_string(REPORT_EDIT, include_str!("templates/reports/edit.hbs"))?;
        registry.register_template_string(REPORT_SHOW, include_str!("templates/reports/show.hbs"))?;
        registry.register_template_string(ERROR_UNKNOWN, include_str!("templates/error.hbs"))?;
        registry.register_template_string(LOGIN, include_str!("templates/login.hbs"))?;
        registry.register_template_string(LOGOUT, include_str!("templates/logout.hbs"))?;

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, HttpError> {
        self.registry
            .render(name, context)
            .map(Html)
            .map_err(|e| {
                error!("Failed to render {}: {}", name, e);
                HttpError::server_error(ErrorMessage::TemplateError.to_string())
            })
    }
}
