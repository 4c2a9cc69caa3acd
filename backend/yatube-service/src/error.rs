/// Error types for the Yatube service
///
/// Errors are rendered as HTML: missing resources get the custom 404 page,
/// unauthenticated access becomes a redirect to the login page, and
/// everything unexpected is logged and answered with the custom 500 page.
use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::templates::{self, Template};

/// Result type for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The request needs a logged-in user; `next` is the path to come back to.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Media(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(detail) => templates::render_with_status(
                StatusCode::NOT_FOUND,
                &Template::NotFound {
                    path: detail.clone(),
                },
            ),
            AppError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, login_url(next)))
                .finish(),
            AppError::Validation(msg) => HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body(msg.clone()),
            other => {
                tracing::error!(error = %other, "request failed");
                templates::render_with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &Template::ServerError,
                )
            }
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Media(err.to_string())
    }
}

/// Login page URL carrying the path to return to, e.g. `/auth/login/?next=/create/`.
pub fn login_url(next: &str) -> String {
    format!("/auth/login/?next={}", urlencoding::encode(next).replace("%2F", "/"))
}
