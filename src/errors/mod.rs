//! Error handling module for the StaffDesk dashboard.
//!
//! Provides the application error type, its mapping to HTTP status codes, and the
//! user-facing message shown when an error is surfaced inside the dashboard.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::models::FlashMessage;
use crate::ui::escape;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const AUTH_FAILED: &str = "AUTH_FAILED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SESSION_ERROR: &str = "SESSION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Login required
    Unauthorized(String),
    /// Credentials rejected
    Auth(String),
    /// Form input rejected; carries the text shown to the user
    Validation(String),
    /// Writing or reading the photo directory or activity log failed; carries the cause
    Storage(String),
    /// Session store failure
    Session(String),
    /// Invalid configuration value
    Config(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Auth(_) => codes::AUTH_FAILED,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Session(_) => codes::SESSION_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Auth(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Session(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }

    /// The message a session sees on its next render after this error.
    ///
    /// Validation problems are warnings; everything else is an error.
    pub fn flash(&self) -> FlashMessage {
        match self {
            AppError::Validation(msg) => FlashMessage::warning(msg.clone()),
            AppError::Storage(cause) => {
                FlashMessage::error(format!("Error saving activity: {}", cause))
            }
            other => FlashMessage::error(other.message()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Storage(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("Activity log error: {:?}", err);
        AppError::Storage(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        tracing::error!("Session error: {:?}", err);
        AppError::Session(format!("Session error: {}", err))
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        tracing::warn!("Multipart error: {:?}", err);
        AppError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = format!(
            "<!DOCTYPE html><html><head><title>{code}</title></head>\
             <body><h1>{status}</h1><p>{message}</p><p><a href=\"/\">Back to dashboard</a></p></body></html>",
            code = self.error_code(),
            status = status,
            message = escape(&self.message()),
        );
        (status, Html(body)).into_response()
    }
}
