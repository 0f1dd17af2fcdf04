//! Authentication-related models

use super::{ensure_not_blank, first_validation_message};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl RegisterRequest {
    pub fn check(&self) -> Result<(), AppError> {
        ensure_not_blank(&self.name, "Name is mandatory")?;
        ensure_not_blank(&self.email, "Email is mandatory")?;
        self.validate().map_err(|e| first_validation_message(&e))
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

impl LoginRequest {
    pub fn check(&self) -> Result<(), AppError> {
        ensure_not_blank(&self.email, "Email is mandatory")?;
        ensure_not_blank(&self.password, "Password is mandatory")?;
        self.validate().map_err(|e| first_validation_message(&e))
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register("Alice", "alice@example.com", "secret1").check().is_ok());
    }

    #[test]
    fn test_register_blank_name() {
        let result = register("   ", "alice@example.com", "secret1").check();
        assert_eq!(message(result), "Name is mandatory");
    }

    #[test]
    fn test_register_blank_email() {
        let result = register("Alice", "", "secret1").check();
        assert_eq!(message(result), "Email is mandatory");
    }

    #[test]
    fn test_register_invalid_email() {
        let result = register("Alice", "not-an-email", "secret1").check();
        assert_eq!(message(result), "Invalid email format");
    }

    #[test]
    fn test_register_short_password() {
        let result = register("Alice", "alice@example.com", "12345").check();
        assert_eq!(message(result), "Password must be at least 6 characters");
    }

    #[test]
    fn test_login_blank_password() {
        let req = LoginRequest {
            email: "alice@example.com".to_string(),
            password: " ".to_string(),
        };
        assert_eq!(message(req.check()), "Password is mandatory");
    }

    #[test]
    fn test_login_invalid_email() {
        let req = LoginRequest {
            email: "alice".to_string(),
            password: "secret1".to_string(),
        };
        assert_eq!(message(req.check()), "Invalid email format");
    }
}
