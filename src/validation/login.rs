use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldName, ValidationErrors};

pub const PASSWORD_MIN: usize = 6;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FieldName for LoginField {
    fn as_str(&self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

pub type LoginErrors = ValidationErrors<LoginField>;

/// Checks run before any credentials leave the machine.
pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    let mut errors = LoginErrors::new();

    if email.is_empty() {
        errors.insert(LoginField::Email, "Email is required");
    } else if !EMAIL.is_match(email) {
        errors.insert(LoginField::Email, "Invalid email");
    }

    if password.is_empty() {
        errors.insert(LoginField::Password, "Password is required");
    } else if password.chars().count() < PASSWORD_MIN {
        errors.insert(LoginField::Password, "Password must be at least 6 characters");
    }

    errors
}
