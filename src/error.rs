//! Error types for Marketplace

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::forms::FieldErrors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("Please enter a correct email and password.")]
    InvalidCredentials,

    #[error("Job {0} not found")]
    JobNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config file not found. Run 'marketplace init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status used when the error reaches the request boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::JobNotFound(_) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Other(format!("background task failed: {}", err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Error::JobNotFound(_) | Error::NotFound(_) => {
                tracing::debug!("{}", self);
                "<h1>Not Found</h1><p>The requested page does not exist.</p>".to_string()
            }
            Error::Validation(_) | Error::InvalidCredentials => {
                format!("<h1>Bad Request</h1><p>{}</p>", self)
            }
            _ => {
                tracing::error!("Request failed: {}", self);
                "<h1>Server Error</h1><p>Something went wrong.</p>".to_string()
            }
        };
        (status, Html(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = Error::JobNotFound(7).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_infrastructure_errors_map_to_500() {
        let response = Error::Other("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_config_toml_is_a_parse_error() {
        let err: Error = toml::from_str::<crate::config::Config>("[server\nport = 1")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::TomlParse(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        let msg = Error::InvalidCredentials.to_string();
        assert!(!msg.to_lowercase().contains("not found"));
        assert!(!msg.to_lowercase().contains("exist"));
    }
}
