use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to list of messages, as reported back to API callers
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Validation error: {}", summarize(.errors))]
    InvalidFields { errors: FieldErrors },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        Self::InvalidFields { errors }
    }

    pub fn fields(errors: FieldErrors) -> Self {
        Self::InvalidFields { errors }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Product 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Product 'abc' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Resource already exists");
        assert_eq!(error.to_string(), "Conflict: Resource already exists");
    }

    #[test]
    fn test_field_error_display() {
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), vec!["Enter a valid email address.".to_string()]);
        errors.insert(
            "password".to_string(),
            vec!["Too short.".to_string(), "Too common.".to_string()],
        );

        let error = DomainError::fields(errors);
        assert_eq!(
            error.to_string(),
            "Validation error: email: Enter a valid email address.; password: Too short. Too common."
        );
    }

    #[test]
    fn test_single_field_error() {
        match DomainError::field("first_name", "First name cannot be empty.") {
            DomainError::InvalidFields { errors } => {
                assert_eq!(errors["first_name"], vec!["First name cannot be empty."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
