//! Input validation functions
//!
//! Each validator collects every failing field instead of stopping at the
//! first one, so clients can fix a form in a single round trip.

use crate::errors::FieldErrors;
use crate::types::{CreateUserRequest, LoginRequest, UpdateUserRequest};
use secrecy::ExposeSecret;
use validator::ValidateEmail;

pub const MIN_FIRST_NAME_LEN: usize = 3;
pub const MIN_LAST_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;
/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_LEN: usize = 72;

/// Validate a login request
///
/// Only presence is checked here. Whether the credentials are any good is
/// the authenticator's business.
pub fn validate_login(req: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if req.email.is_empty() {
        errors.insert("email".to_string(), "email is required".to_string());
    }
    if req.password.expose_secret().is_empty() {
        errors.insert("password".to_string(), "password is required".to_string());
    }
    errors
}

/// Validate a create user request
pub fn validate_create_user(req: &CreateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_name("firstName", &req.first_name, MIN_FIRST_NAME_LEN) {
        errors.insert("firstName".to_string(), msg);
    }
    if let Err(msg) = validate_name("lastName", &req.last_name, MIN_LAST_NAME_LEN) {
        errors.insert("lastName".to_string(), msg);
    }
    let password = req.password.expose_secret();
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password".to_string(),
            format!("password length should be at least {} characters", MIN_PASSWORD_LEN),
        );
    } else if password.len() > MAX_PASSWORD_LEN {
        errors.insert(
            "password".to_string(),
            format!("password length should be at most {} bytes", MAX_PASSWORD_LEN),
        );
    }
    if let Err(msg) = validate_email(&req.email) {
        errors.insert("email".to_string(), msg);
    }
    errors
}

/// Validate an update user request
///
/// Absent fields are not checked.
pub fn validate_update_user(req: &UpdateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(first_name) = &req.first_name {
        if let Err(msg) = validate_name("firstName", first_name, MIN_FIRST_NAME_LEN) {
            errors.insert("firstName".to_string(), msg);
        }
    }
    if let Some(last_name) = &req.last_name {
        if let Err(msg) = validate_name("lastName", last_name, MIN_LAST_NAME_LEN) {
            errors.insert("lastName".to_string(), msg);
        }
    }
    if let Some(email) = &req.email {
        if let Err(msg) = validate_email(email) {
            errors.insert("email".to_string(), msg);
        }
    }
    errors
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }
    if !email.validate_email() {
        return Err(format!("email {} is invalid", email));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str, min_len: usize) -> Result<(), String> {
    if value.chars().count() < min_len {
        return Err(format!(
            "{} length should be at least {} characters",
            field, min_len
        ));
    }
    Ok(())
}
