//! Typed errors and HTTP mapping.

use crate::service::Violation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Book not found: {0}")]
    NotFound(String),
    #[error("Bad request: {}", join_violations(.0))]
    Validation(Vec<Violation>),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Book already exists: {0}")]
    Conflict(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Body the extractor refused before validation (wrong content type, too large).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match &self {
            AppError::Validation(violations) => ErrorBody {
                error: self.to_string(),
                details: Some(violations.iter().map(ToString::to_string).collect()),
            },
            // Driver messages stay in the log.
            AppError::Db(_) if status.is_server_error() => ErrorBody {
                error: "database error".into(),
                details: None,
            },
            _ => ErrorBody {
                error: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ViolationKind;

    #[test]
    fn validation_message_lists_every_violation() {
        let err = AppError::Validation(vec![
            Violation {
                field: "pages".into(),
                kind: ViolationKind::WrongType { expected: "an integer" },
            },
            Violation {
                field: "year".into(),
                kind: ViolationKind::AboveMaximum { max: 2027 },
            },
        ]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Bad request: pages must be an integer; year must be at most 2027"
        );
    }

    #[test]
    fn statuses_separate_client_and_server_faults() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Db(sqlx::Error::PoolTimedOut).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Config(ConfigError::Missing("DB_URI")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
