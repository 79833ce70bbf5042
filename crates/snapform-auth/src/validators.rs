//! Account input rules: passwords, sign-up, profile and password changes.

use serde::Deserialize;
use snapform_core::ValidationError;
use snapform_forms::validators::is_valid_email;

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";
pub const INVALID_EMAIL: &str = "Invalid email address";

/// A single password rule.
pub trait PasswordValidator: Send + Sync {
    /// Returns the failure message, if any.
    fn validate(&self, password: &str) -> Result<(), String>;
}

/// Rejects passwords shorter than `min_length` characters.
#[derive(Debug, Clone)]
pub struct MinimumLengthValidator {
    pub min_length: usize,
}

impl Default for MinimumLengthValidator {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordValidator for MinimumLengthValidator {
    fn validate(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            Err(format!(
                "Password must be at least {} characters",
                self.min_length
            ))
        } else {
            Ok(())
        }
    }
}

fn check_password(errors: &mut ValidationError, field: &str, password: &str) {
    if let Err(message) = MinimumLengthValidator::default().validate(password) {
        errors.push(field, message);
    }
}

fn check_email(errors: &mut ValidationError, email: &str) {
    if !is_valid_email(email.trim()) {
        errors.push("email", INVALID_EMAIL);
    }
}

/// `POST /api/auth/signup`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, "password", &self.password);
        errors.into_result()
    }
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `PATCH /api/profile/update`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if self.name.trim().chars().count() < 2 {
            errors.push("name", "Name must be at least 2 characters");
        }
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}

/// `PATCH /api/profile/password`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_password(&mut errors, "currentPassword", &self.current_password);
        check_password(&mut errors, "newPassword", &self.new_password);
        check_password(&mut errors, "confirmPassword", &self.confirm_password);
        if self.new_password != self.confirm_password {
            errors.push("confirmPassword", PASSWORDS_DONT_MATCH);
        }
        errors.into_result()
    }
}
