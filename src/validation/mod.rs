//! Pure input checks shared by the JSON API and the signup pages.

pub mod email;
pub mod password;
pub mod phone;

use thiserror::Error;

/// Rejected user input. Never retried, reported back as a 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Password must be at least 8 characters and include upper and lower case letters, a digit and a symbol")]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Trim and lowercase a username so lookups and the unique index agree.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Same policy as usernames: trimmed, lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A username must be non-empty after normalization and contain neither
/// whitespace nor `@`, so it can never collide with an email at login.
pub fn check_username(normalized: &str) -> Result<(), ValidationError> {
    if normalized.is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if normalized.chars().any(|c| c.is_whitespace() || c == '@') {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

/// Trimmed, non-empty value or a `MissingField` error.
pub fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_and_lowercased() {
        assert_eq!(normalize_username("  Bob "), "bob");
    }

    #[test]
    fn username_rules() {
        assert_eq!(
            check_username(""),
            Err(ValidationError::MissingField("username"))
        );
        assert_eq!(check_username("bo b"), Err(ValidationError::InvalidUsername));
        assert!(check_username("bob_99").is_ok());
    }

    #[test]
    fn username_cannot_look_like_an_email() {
        assert_eq!(
            check_username("ann@example.com"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(check_username("@ann"), Err(ValidationError::InvalidUsername));
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(required("   ", "name"), Err(ValidationError::MissingField("name")));
        assert_eq!(required(" Ann ", "name"), Ok("Ann"));
    }
}
