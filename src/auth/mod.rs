pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::User;

pub use extractors::AuthenticatedUser;
pub use middleware::{AuthMiddleware, OwnerGuard};
pub use password::{hash_password, verify_password};
pub use token::{generate_access_token, verify_token, Claims};

lazy_static! {
    // userName: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Represents the payload for a login request.
///
/// Missing fields deserialize as empty strings so they are reported as a
/// validation failure rather than a JSON error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn check_required(&self) -> Result<(), AppError> {
        if self.user_name.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::ValidationError(
                "Username and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Must be between 3 and 32 characters: letters, digits, underscores or hyphens.
    #[serde(default)]
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub user_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn check_required(&self) -> Result<(), AppError> {
        let fields = [
            &self.user_name,
            &self.email,
            &self.first_name,
            &self.last_name,
            &self.password,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::ValidationError("All fields are required".into()));
        }
        Ok(())
    }
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_name: String,
}

/// Response structure after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(user_name: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            user_name: user_name.to_string(),
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "password123".to_string(),
        }
    }

    #[test]
    fn test_login_request_required_fields() {
        let parsed: LoginRequest = serde_json::from_str(r#"{"userName":"ada"}"#).unwrap();
        assert!(matches!(
            parsed.check_required(),
            Err(AppError::ValidationError(_))
        ));

        let parsed: LoginRequest =
            serde_json::from_str(r#"{"userName":"ada","password":"pw"}"#).unwrap();
        assert!(parsed.check_required().is_ok());
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("test_user-123", "test@example.com").validate().is_ok());
        assert!(register("test user!", "test@example.com").validate().is_err());
        assert!(register("tu", "test@example.com").validate().is_err());
        assert!(register("test_user", "testexample.com").validate().is_err());
    }

    #[test]
    fn test_register_request_required_fields() {
        let parsed: RegisterRequest = serde_json::from_str(
            r#"{"userName":"ada","email":"ada@example.com","password":"pw","firstName":"Ada"}"#,
        )
        .unwrap();
        match parsed.check_required() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "All fields are required"),
            other => panic!("expected validation error, got {:?}", other),
        }

        assert!(register("ada", "ada@example.com").check_required().is_ok());
    }

    #[test]
    fn test_auth_response_wire_format() {
        let json = serde_json::to_value(AuthResponse {
            token: "t".into(),
            user_name: "ada".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "token": "t", "userName": "ada" }));
    }
}
