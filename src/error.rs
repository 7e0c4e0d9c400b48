//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce, from a missing field to a broken database
//! connection, is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Every error response carries a JSON body of the form `{"message": "..."}`.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow the `?` operator
//! to be used throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request fields (HTTP 400).
    ValidationError(String),
    /// Bad credentials or a missing/invalid bearer token (HTTP 401).
    Unauthorized(String),
    /// The authenticated user is not allowed to touch the addressed resource (HTTP 403).
    Forbidden(String),
    /// A unique field (email, userName, listID, taskID) is already taken (HTTP 400).
    Conflict(String),
    /// The addressed User, List, or Task does not exist (HTTP 404).
    NotFound(String),
    /// Hashing, signing, or configuration failures (HTTP 500).
    InternalServerError(String),
    /// Errors originating from the persistence layer (HTTP 500).
    /// The detail is logged, never sent to the client.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message exposed to API clients.
    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg) => msg,
            AppError::DatabaseError(_) => "Database error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::DatabaseError(detail) = self {
            log::error!("database error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `AppError::Conflict`; everything else is a
/// `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(conflict_message(db_err.constraint()).into())
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Names the taken field for the unique constraints in `migrations/`.
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "Email already exists",
        Some("users_pkey") => "Username already exists",
        Some("lists_list_id_key") => "List already exists",
        Some("tasks_task_id_key") => "Task already exists",
        _ => "Resource already exists",
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Field messages are sorted and joined so the response text is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        AppError::ValidationError(messages.join("; "))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_responses() {
        let cases = [
            (AppError::ValidationError("bad".into()), 400),
            (AppError::Conflict("Email already exists".into()), 400),
            (AppError::Unauthorized("Invalid token".into()), 401),
            (AppError::Forbidden("Access denied".into()), 403),
            (AppError::NotFound("Task not found".into()), 404),
            (AppError::InternalServerError("Server error".into()), 500),
            (AppError::DatabaseError("connection reset".into()), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_web::test]
    async fn test_error_body_carries_message() {
        let response = AppError::NotFound("List not found".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "message": "List not found" }));
    }

    #[actix_web::test]
    async fn test_database_detail_is_masked() {
        let response = AppError::DatabaseError("password authentication failed".into())
            .error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Database error");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[test]
    fn test_conflict_message_names_the_constraint() {
        assert_eq!(conflict_message(Some("users_email_key")), "Email already exists");
        assert_eq!(conflict_message(Some("users_pkey")), "Username already exists");
        assert_eq!(conflict_message(Some("lists_list_id_key")), "List already exists");
        assert_eq!(conflict_message(Some("tasks_task_id_key")), "Task already exists");
        assert_eq!(conflict_message(None), "Resource already exists");
    }
}
