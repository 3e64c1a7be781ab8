//! Authentication primitives such as sign-in credentials.
//!
//! Inbound adapters build these from raw strings before a store talks to the
//! auth port, so validation never depends on the transport.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum password length accepted by the hosted auth service.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Sign-up requires a display name.
    EmptyFullName,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyFullName => write!(f, "full name must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated email/password credentials.
///
/// ## Invariants
/// - `email` is trimmed and well formed.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use land_registry::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("test@example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "test@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look up the account.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Credentials plus the profile fields captured at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    credentials: Credentials,
    full_name: String,
}

impl SignUpDetails {
    /// Validate sign-up input. Passwords must meet [`PASSWORD_MIN`].
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(CredentialsValidationError::EmptyFullName);
        }
        Ok(Self {
            credentials,
            full_name: full_name.to_owned(),
        })
    }

    /// Email and password for the new account.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Display name stored in the account metadata.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }
}
