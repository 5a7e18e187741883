use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered user, keyed externally by case-sensitive username.
///
/// Accounts are created once at registration and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Raw registration form input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

/// Registration input that passed validation. Username and display name are
/// trimmed; the password is taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("All fields are required")]
    MissingFields,
}

impl RegistrationDraft {
    /// Validate the draft into registration input a service can act on.
    ///
    /// Mismatched passwords are reported before missing fields, so a form
    /// with both problems shows the mismatch first.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError` when passwords differ or any required
    /// field is empty after trimming.
    pub fn validate(self) -> Result<ValidatedRegistration, RegistrationError> {
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        let username = self.username.trim().to_string();
        let name = self.name.trim().to_string();
        if username.is_empty() || self.password.is_empty() || name.is_empty() {
            return Err(RegistrationError::MissingFields);
        }

        Ok(ValidatedRegistration {
            username,
            password: self.password,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RegistrationDraft {
        RegistrationDraft {
            username: "ada".to_string(),
            password: "hunter2".to_string(),
            confirm_password: "hunter2".to_string(),
            name: "Ada Lovelace".to_string(),
        }
    }

    #[test]
    fn valid_draft_trims_username_and_name() {
        let mut input = draft();
        input.username = "  ada ".to_string();
        input.name = " Ada Lovelace\n".to_string();

        let validated = input.validate().unwrap();
        assert_eq!(validated.username, "ada");
        assert_eq!(validated.name, "Ada Lovelace");
    }

    #[test]
    fn mismatched_passwords_rejected_first() {
        let mut input = draft();
        input.username = String::new();
        input.confirm_password = "hunter3".to_string();

        assert_eq!(
            input.validate().unwrap_err(),
            RegistrationError::PasswordMismatch
        );
    }

    #[test]
    fn blank_required_fields_rejected() {
        for blank in ["username", "password", "name"] {
            let mut input = draft();
            match blank {
                "username" => input.username = "   ".to_string(),
                "password" => {
                    input.password = String::new();
                    input.confirm_password = String::new();
                }
                _ => input.name = String::new(),
            }
            assert_eq!(input.validate().unwrap_err(), RegistrationError::MissingFields);
        }
    }

    #[test]
    fn password_is_not_trimmed() {
        let mut input = draft();
        input.password = " spaced ".to_string();
        input.confirm_password = " spaced ".to_string();

        assert_eq!(input.validate().unwrap().password, " spaced ");
    }
}
