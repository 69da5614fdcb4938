//! Input validation for the console forms
//!
//! Each form is checked field by field in display order and the first failure
//! is returned, so the caller can highlight one field and keep the rest of
//! the form populated.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ChangePasswordRequest, ContactSupportRequest, FeedbackRequest, ForgotPasswordRequest,
    LoginRequest, NewUser, RegisterRequest, ResetPasswordRequest, Role, UpdateUser,
};

/// Minimum length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate email
pub fn validate_email(field: &'static str, email: &str) -> ApiResult<()> {
    if email.len() > 254 {
        return Err(ApiError::validation(
            field,
            "Email must be at most 254 characters long.",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ApiError::validation(field, "Invalid email address."));
    }

    Ok(())
}

/// Validate that a trimmed value has between `min` and `max` characters
pub fn validate_length(
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) -> ApiResult<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(ApiError::validation(
            field,
            format!("{label} must be at least {min} characters."),
        ));
    }
    if len > max {
        return Err(ApiError::validation(
            field,
            format!("{label} must be at most {max} characters."),
        ));
    }
    Ok(())
}

fn validate_required(field: &'static str, label: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(field, format!("{label} is required.")));
    }
    Ok(())
}

fn validate_new_password(field: &'static str, password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        ));
    }
    if password.len() > 128 {
        return Err(ApiError::validation(
            field,
            "Password must be at most 128 characters.",
        ));
    }
    Ok(())
}

fn validate_names(first_name: &str, last_name: &str) -> ApiResult<()> {
    validate_length("firstName", "First name", first_name, 2, 50)?;
    validate_length("lastName", "Last name", last_name, 2, 50)
}

/// At least one role, and no blank role names
fn validate_roles(roles: &[Role]) -> ApiResult<()> {
    if roles.is_empty() || roles.iter().any(|r| r.as_str().trim().is_empty()) {
        return Err(ApiError::validation(
            "roles",
            "At least one role must be selected.",
        ));
    }
    Ok(())
}

/// Validate the user create form
pub fn validate_new_user(user: &NewUser) -> ApiResult<()> {
    validate_names(&user.first_name, &user.last_name)?;
    validate_email("email", &user.email)?;
    if let Some(password) = user.password.as_deref().filter(|p| !p.is_empty()) {
        validate_new_password("password", password)?;
    }
    validate_roles(&user.roles)
}

/// Validate the user edit and profile forms; only present fields are checked
pub fn validate_update_user(update: &UpdateUser) -> ApiResult<()> {
    if let Some(first_name) = &update.first_name {
        validate_length("firstName", "First name", first_name, 2, 50)?;
    }
    if let Some(last_name) = &update.last_name {
        validate_length("lastName", "Last name", last_name, 2, 50)?;
    }
    if let Some(email) = &update.email {
        validate_email("email", email)?;
    }
    if let Some(roles) = &update.roles {
        validate_roles(roles)?;
    }
    Ok(())
}

/// Validate the login form
pub fn validate_login(request: &LoginRequest) -> ApiResult<()> {
    validate_email("email", &request.email)?;
    if request.password.is_empty() {
        return Err(ApiError::validation("password", "Password is required."));
    }
    Ok(())
}

/// Validate the registration form
pub fn validate_register(request: &RegisterRequest) -> ApiResult<()> {
    validate_names(&request.first_name, &request.last_name)?;
    validate_email("email", &request.email)?;
    validate_new_password("password", &request.password)
}

/// Validate the forgot-password form
pub fn validate_forgot_password(request: &ForgotPasswordRequest) -> ApiResult<()> {
    validate_email("email", &request.email)
}

/// Validate the reset-password form
pub fn validate_reset_password(request: &ResetPasswordRequest) -> ApiResult<()> {
    validate_required("token", "Reset token", &request.token)?;
    validate_new_password("password", &request.password)?;
    if request.password != request.confirm_password {
        return Err(ApiError::validation(
            "confirmPassword",
            "Passwords do not match.",
        ));
    }
    Ok(())
}

/// Validate the change-password form
pub fn validate_change_password(request: &ChangePasswordRequest) -> ApiResult<()> {
    validate_required("currentPassword", "Current password", &request.current_password)?;
    validate_new_password("newPassword", &request.new_password)?;
    if request.new_password == request.current_password {
        return Err(ApiError::validation(
            "newPassword",
            "New password must differ from the current password.",
        ));
    }
    Ok(())
}

/// Validate the contact-support form
pub fn validate_contact_support(request: &ContactSupportRequest) -> ApiResult<()> {
    validate_length("name", "Name", &request.name, 2, 100)?;
    validate_email("email", &request.email)?;
    validate_length("subject", "Subject", &request.subject, 5, 100)?;
    validate_length("message", "Message", &request.message, 20, 2000)
}

/// Validate the feedback form; the email is optional but must be valid when given
pub fn validate_feedback(request: &FeedbackRequest) -> ApiResult<()> {
    if let Some(email) = request.email.as_deref().filter(|e| !e.is_empty()) {
        validate_email("email", email)?;
    }
    validate_length("subject", "Subject", &request.subject, 5, 100)?;
    validate_length("message", "Message", &request.message, 10, 1000)
}
