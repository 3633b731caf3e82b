//! Client-side form validation
//!
//! Mirrors the server's request schema so forms can report problems before a
//! round trip. The API client never calls these; every call is still sent.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{LoginRequest, RegisterRequest};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Field name to human-readable problem. Empty means valid.
pub type FormErrors = BTreeMap<String, String>;

#[allow(clippy::expect_used)] // literal pattern, checked by tests
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Validate a login form.
pub fn validate_login(request: &LoginRequest) -> FormErrors {
    let mut errors = FormErrors::new();
    check_email(&request.email, &mut errors);
    if request.password.is_empty() {
        errors.insert("password".into(), "Password is required".into());
    }
    errors
}

/// Validate a registration form.
pub fn validate_registration(request: &RegisterRequest) -> FormErrors {
    let mut errors = FormErrors::new();

    let username_len = request.username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
        errors.insert(
            "username".into(),
            format!("Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"),
        );
    }

    check_email(&request.email, &mut errors);

    if request.password.chars().count() < PASSWORD_MIN_LEN {
        errors.insert(
            "password".into(),
            format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
        );
    }

    errors
}

fn check_email(email: &str, errors: &mut FormErrors) {
    if email.is_empty() {
        errors.insert("email".into(), "Email is required".into());
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.insert("email".into(), "Invalid email format".into());
    }
}
