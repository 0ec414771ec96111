//! Client-side validation for login, registration and review input.
//!
//! Validation collects every field problem at once so a front end can show
//! them next to their fields.

use core::fmt;

use booklend_core::{BookId, Email};
use secrecy::{ExposeSecret, SecretString};

use crate::api::NewReview;

/// Input field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    Rating,
}

impl Field {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::Rating => "Rating",
        }
    }
}

/// One problem with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn required(field: Field) -> Self {
        Self {
            field,
            message: format!("{} is required", field.label()),
        }
    }

    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Form input was rejected before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Message for `field`, if it has one.
    #[must_use]
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

fn finish(errors: Vec<FieldError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

fn check_email(raw: &str, errors: &mut Vec<FieldError>) {
    if raw.trim().is_empty() {
        errors.push(FieldError::required(Field::Email));
    } else if Email::parse(raw).is_err() {
        errors.push(FieldError::new(Field::Email, "Email is invalid"));
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Sign-in credentials.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns every missing or malformed field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.expose_secret().trim().is_empty() {
            errors.push(FieldError::required(Field::Password));
        }
        finish(errors)
    }
}

/// New account details.
///
/// The phone number is required here but the registration endpoint does not
/// accept it, so it is never sent.
#[derive(Debug)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns every missing or malformed field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::required(Field::Name));
        }
        check_email(&self.email, &mut errors);
        if self.phone.trim().is_empty() {
            errors.push(FieldError::required(Field::Phone));
        }

        let password = self.password.expose_secret();
        let confirm = self.confirm_password.expose_secret();
        if password.is_empty() {
            errors.push(FieldError::required(Field::Password));
        }
        if confirm.is_empty() {
            errors.push(FieldError::required(Field::ConfirmPassword));
        } else if !password.is_empty() && password != confirm {
            errors.push(FieldError::new(
                Field::ConfirmPassword,
                "Passwords do not match",
            ));
        }

        finish(errors)
    }
}

/// A review about to be submitted. A star value of 0 means no rating yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub book_id: BookId,
    pub star: u8,
    pub comment: String,
}

impl ReviewForm {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns an error when no rating was given or it is above 5.
    pub fn into_request(self) -> Result<NewReview, ValidationError> {
        let mut errors = Vec::new();
        match self.star {
            0 => errors.push(FieldError::new(Field::Rating, "Please give a rating first")),
            1..=5 => {}
            _ => errors.push(FieldError::new(
                Field::Rating,
                "Rating must be between 1 and 5",
            )),
        }
        finish(errors)?;

        Ok(NewReview {
            book_id: self.book_id,
            star: self.star,
            comment: self.comment.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Ann Reader".to_string(),
            email: "ann@library.test".to_string(),
            phone: "0812".to_string(),
            password: secret("hunter22"),
            confirm_password: secret("hunter22"),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm {
            email: "  ".to_string(),
            password: secret(""),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.message_for(Field::Email), Some("Email is required"));
        assert_eq!(err.message_for(Field::Password), Some("Password is required"));
        assert_eq!(err.to_string(), "Email is required; Password is required");
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let form = LoginForm {
            email: "ann".to_string(),
            password: secret("pw"),
        };
        assert_eq!(
            form.validate().unwrap_err().message_for(Field::Email),
            Some("Email is invalid")
        );
    }

    #[test]
    fn test_register_valid() {
        assert!(register_form().validate().is_ok());
    }

    #[test]
    fn test_register_collects_missing_fields() {
        let form = RegisterForm {
            name: String::new(),
            phone: " ".to_string(),
            ..register_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.message_for(Field::Name), Some("Name is required"));
        assert_eq!(err.message_for(Field::Phone), Some("Phone is required"));
    }

    #[test]
    fn test_register_password_mismatch() {
        let form = RegisterForm {
            confirm_password: secret("hunter23"),
            ..register_form()
        };
        assert_eq!(
            form.validate().unwrap_err().message_for(Field::ConfirmPassword),
            Some("Passwords do not match")
        );

        let form = RegisterForm {
            confirm_password: secret(""),
            ..register_form()
        };
        assert_eq!(
            form.validate().unwrap_err().message_for(Field::ConfirmPassword),
            Some("Confirm password is required")
        );
    }

    #[test]
    fn test_review_requires_rating() {
        let form = ReviewForm {
            book_id: BookId::new(4),
            star: 0,
            comment: "Loved it".to_string(),
        };
        assert_eq!(
            form.into_request().unwrap_err().to_string(),
            "Please give a rating first"
        );
    }

    #[test]
    fn test_review_builds_request() {
        let form = ReviewForm {
            book_id: BookId::new(4),
            star: 5,
            comment: " Loved it ".to_string(),
        };
        let review = form.into_request().unwrap();
        assert_eq!(review.star, 5);
        assert_eq!(review.comment, "Loved it");

        let form = ReviewForm {
            book_id: BookId::new(4),
            star: 6,
            comment: String::new(),
        };
        assert!(form.into_request().is_err());
    }
}
