//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("'{0}' is not a valid user ID")]
    InvalidId(String),

    #[error("This field may not be blank.")]
    EmptyEmail,

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Ensure this field has no more than {0} characters.")]
    FieldTooLong(usize),

    #[error("This password is too short. It must contain at least {0} characters.")]
    PasswordTooShort(usize),

    #[error("This password is too long. It must contain at most {0} characters.")]
    PasswordTooLong(usize),

    #[error("This password is entirely numeric.")]
    PasswordNumeric,

    #[error("This password is too common.")]
    PasswordCommon,

    #[error("The password is too similar to the email.")]
    PasswordSimilarToEmail,

    #[error("Password fields didn't match.")]
    PasswordMismatch,

    #[error("{0} cannot be empty.")]
    BlankName(&'static str),
}

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const MIN_SIMILARITY_PART: usize = 3;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "trustno1",
    "superman",
    "starwars",
    "whatever",
    "dragon123",
    "monkey123",
    "abc12345",
    "admin123",
    "changeme",
    "11111111",
    "00000000",
    "asdfghjkl",
    "zaq12wsx",
    "1q2w3e4r",
];

/// Trim and lower-case an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already-normalized email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::FieldTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Check a registration password against the strength policy.
///
/// Every violated rule is reported, in the order the rules are checked.
pub fn validate_password_strength(
    password: &str,
    email: &str,
) -> Result<(), Vec<UserValidationError>> {
    let mut errors = Vec::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        errors.push(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if length > MAX_PASSWORD_LENGTH {
        errors.push(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push(UserValidationError::PasswordNumeric);
    }

    let lowered = password.to_lowercase();

    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        errors.push(UserValidationError::PasswordCommon);
    }

    if is_similar_to_email(&lowered, email) {
        errors.push(UserValidationError::PasswordSimilarToEmail);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_similar_to_email(lowered_password: &str, email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default().to_lowercase();

    if local.chars().count() < MIN_SIMILARITY_PART || lowered_password.is_empty() {
        return false;
    }

    lowered_password.contains(&local) || local.contains(lowered_password)
}

/// Validate a supplied display name and return the value to store.
///
/// An empty string clears the field; whitespace-only input is rejected.
pub fn validate_name(
    label: &'static str,
    value: &str,
) -> Result<String, UserValidationError> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(UserValidationError::BlankName(label));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::FieldTooLong(MAX_NAME_LENGTH));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
        assert_eq!(normalize_email("user@example.com"), "user@example.com");
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(
            validate_email("not-an-email"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("a@b"),
            Err(UserValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("a b@c.com"),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&email),
            Err(UserValidationError::FieldTooLong(MAX_EMAIL_LENGTH))
        );
    }

    #[test]
    fn test_strong_password() {
        assert!(validate_password_strength("Str0ng!Pass", "a@b.com").is_ok());
    }

    #[test]
    fn test_short_password() {
        let errors = validate_password_strength("Ab1!", "a@b.com").unwrap_err();
        assert_eq!(errors, vec![UserValidationError::PasswordTooShort(8)]);
    }

    #[test]
    fn test_long_password() {
        let password = "Xy9!".repeat(40);
        let errors = validate_password_strength(&password, "a@b.com").unwrap_err();
        assert_eq!(errors, vec![UserValidationError::PasswordTooLong(128)]);
    }

    #[test]
    fn test_numeric_and_common_password() {
        let errors = validate_password_strength("12345678", "a@b.com").unwrap_err();
        assert!(errors.contains(&UserValidationError::PasswordNumeric));
        assert!(errors.contains(&UserValidationError::PasswordCommon));
    }

    #[test]
    fn test_common_password_is_case_insensitive() {
        let errors = validate_password_strength("PassWord123", "a@b.com").unwrap_err();
        assert_eq!(errors, vec![UserValidationError::PasswordCommon]);
    }

    #[test]
    fn test_password_similar_to_email() {
        let errors =
            validate_password_strength("johnsmith2024", "johnsmith@example.com").unwrap_err();
        assert_eq!(errors, vec![UserValidationError::PasswordSimilarToEmail]);
    }

    #[test]
    fn test_short_local_part_is_not_compared() {
        assert!(validate_password_strength("abXy9!zzQ", "ab@example.com").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UserValidationError::PasswordMismatch.to_string(),
            "Password fields didn't match."
        );
        assert_eq!(
            UserValidationError::BlankName("First name").to_string(),
            "First name cannot be empty."
        );
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("First name", "  Ada ").unwrap(), "Ada");
        assert_eq!(validate_name("First name", "").unwrap(), "");
        assert_eq!(
            validate_name("Last name", "   "),
            Err(UserValidationError::BlankName("Last name"))
        );
        assert_eq!(
            validate_name("Last name", &"x".repeat(151)),
            Err(UserValidationError::FieldTooLong(MAX_NAME_LENGTH))
        );
    }
}
