use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// Import Axum types for HTTP response conversion
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Structured validation errors with field-level error mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrors {
    Single { field: String, message: String },
    Multiple { fields: HashMap<String, String> },
}

impl ValidationErrors {
    /// Shorthand for a single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationErrors::Single {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrors::Single { field, message } => write!(f, "{}: {}", field, message),
            ValidationErrors::Multiple { fields } => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();
                let joined = keys
                    .into_iter()
                    .map(|k| format!("{}: {}", k, fields[k]))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}", joined)
            }
        }
    }
}

/// The custom error type for the application.
///
/// Provider-side completion problems are deliberately absent: they are
/// reported as [`crate::services::completion::CompletionFailure`] data.
#[derive(Debug, Error)]
pub enum Error {
    /// The role is not present in the answer catalog.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The question is not registered under the given role.
    #[error("Unknown question for role '{role}': {question}")]
    UnknownQuestion { role: String, question: String },

    /// A free-text question was empty or whitespace only.
    #[error("Question cannot be empty")]
    EmptyQuestion,

    /// No API credential is configured for the named provider.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// A validation error with field-level details.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The catalog artifact could not be parsed or is malformed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An I/O error (catalog file, listener bind).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnknownRole(_) => "UNKNOWN_ROLE",
            Error::UnknownQuestion { .. } => "UNKNOWN_QUESTION",
            Error::EmptyQuestion => "EMPTY_QUESTION",
            Error::MissingCredential(_) => "MISSING_CREDENTIAL",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Catalog(_) => "CATALOG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::UnknownRole(_) => StatusCode::NOT_FOUND,
            Error::UnknownQuestion { .. } => StatusCode::NOT_FOUND,
            Error::EmptyQuestion => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingCredential(_)
            | Error::Catalog(_)
            | Error::Internal(_)
            | Error::Config(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response
///
/// Each variant maps to a status code and a JSON body with an error message
/// and error code. Server-side details (config, I/O) are not echoed back.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            Error::Validation(errors) => match errors {
                ValidationErrors::Single { field, message } => {
                    serde_json::json!({
                        "error": "Validation failed",
                        "code": code,
                        "fields": {
                            field: message
                        }
                    })
                }
                ValidationErrors::Multiple { fields } => {
                    serde_json::json!({
                        "error": "Validation failed",
                        "code": code,
                        "fields": fields
                    })
                }
            },
            Error::UnknownRole(_)
            | Error::UnknownQuestion { .. }
            | Error::EmptyQuestion
            | Error::NotFound(_) => {
                serde_json::json!({
                    "error": self.to_string(),
                    "code": code
                })
            }
            Error::MissingCredential(_) => {
                serde_json::json!({
                    "error": "Completion service is not configured",
                    "code": code
                })
            }
            Error::Catalog(_) | Error::Internal(_) | Error::Io(_) => {
                tracing::error!(error = %self, "Internal error while handling request");
                serde_json::json!({
                    "error": "Internal server error",
                    "code": code
                })
            }
            Error::Config(_) => {
                serde_json::json!({
                    "error": "Configuration error",
                    "code": code
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
