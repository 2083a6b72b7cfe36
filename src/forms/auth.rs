//! Signup and login forms.

use crate::auth::Role;
use crate::error::{ClientError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Account creation input.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

impl SignupForm {
    /// Check the form, reporting the first failing rule. Returns the role.
    pub fn validate(&self) -> Result<Role> {
        if self.email.trim().is_empty() {
            return Err(invalid("Please enter your email address"));
        }
        let Some(role) = self.role else {
            return Err(invalid("Please select your role"));
        };
        if self.password.is_empty() {
            return Err(invalid("Please enter a password"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(invalid("Please enter a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("Password must be at least 8 characters long"));
        }
        if self.password != self.confirm_password {
            return Err(invalid("Passwords do not match"));
        }
        Ok(role)
    }
}

/// Sign-in input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Role> {
        if self.email.trim().is_empty() {
            return Err(invalid("Please enter your email address"));
        }
        self.role.ok_or_else(|| invalid("Please select your role"))
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}
