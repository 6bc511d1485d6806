use axum::{ http::StatusCode, response::{ Html, IntoResponse, Response } };
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    DatabaseError,
    InternalServerError,
    TemplateError,
    NotFound,
    InvalidFormToken,
    WrongCredentials,
    ReportDateRequired,
    TitleRequired,
    TitleTooLong(u64),
    ContentRequired,
    StartTimeRequired,
    FinishTimeRequired,
    FinishBeforeStart,
}

impl ToString for ErrorMessage {
    fn to_string(&self) -> String {
        self.to_str().to_owned()
    }
}

impl ErrorMessage {
    fn to_str(&self) -> String {
        match self {
            ErrorMessage::DatabaseError => "Error connecting to the database".to_string(),
            ErrorMessage::InternalServerError =>
                "Server Error. Please try again later.".to_string(),
            ErrorMessage::TemplateError => "Unable to render the requested page".to_string(),
            ErrorMessage::NotFound => "The requested page could not be found".to_string(),
            ErrorMessage::InvalidFormToken =>
                "The form has expired or was not issued by this site. Please reload it and try again.".to_string(),
            ErrorMessage::WrongCredentials =>
                "Employee code or password is incorrect.".to_string(),
            ErrorMessage::ReportDateRequired =>
                "Please enter the report date (yyyy-MM-dd).".to_string(),
            ErrorMessage::TitleRequired => "Please enter a title.".to_string(),
            ErrorMessage::TitleTooLong(max_length) =>
                format!("Titles must not be more than {} characters.", max_length),
            ErrorMessage::ContentRequired => "Please enter the report content.".to_string(),
            ErrorMessage::StartTimeRequired =>
                "Please enter the start time (yyyy-MM-ddTHH:mm).".to_string(),
            ErrorMessage::FinishTimeRequired =>
                "Please enter the finish time (yyyy-MM-ddTHH:mm).".to_string(),
            ErrorMessage::FinishBeforeStart =>
                "The finish time must not be earlier than the start time.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Bare HTML page used when the template layer itself is unavailable.
    pub fn into_http_response(self) -> Response {
        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Error</title></head>\
             <body><h2>{}</h2><p><a href=\"/reports\">Back to the report list</a></p></body></html>",
            handlebars::html_escape(&self.message)
        );

        (self.status, Html(body)).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpError: message: {}, status: {}", self.message, self.status)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// One-shot notices stored in the session and shown on the next page.
#[derive(Debug, PartialEq)]
pub enum InfoMessage {
    Registered,
    Updated,
    LoggedIn,
    LoggedOut,
}

impl ToString for InfoMessage {
    fn to_string(&self) -> String {
        match self {
            InfoMessage::Registered => "Registration completed.".to_string(),
            InfoMessage::Updated => "Update completed.".to_string(),
            InfoMessage::LoggedIn => "Logged in.".to_string(),
            InfoMessage::LoggedOut => "Logged out.".to_string(),
        }
    }
}
