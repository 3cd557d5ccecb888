//! Authentication primitives: credentials, registrations and sessions.
//!
//! Inbound adapters build these from raw payload strings before calling a
//! driving port, so the account service only ever sees validated shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, Persona, UserId, UserValidationError};

/// Login payload values that failed basic shape checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Credentials presented at login.
///
/// ## Invariants
/// - `email` is trimmed and non-empty; it is not format-checked here so that a
///   malformed address fails exactly like an unknown one.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@x.com ", "p@ss1").unwrap();
/// assert_eq!(creds.email(), "a@x.com");
/// assert_eq!(creds.password(), "p@ss1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed email as typed by the caller.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Registration payload values that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Email failed validation.
    #[error(transparent)]
    Email(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Persona failed validation.
    #[error(transparent)]
    Persona(UserValidationError),
}

impl RegistrationValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::EmptyPassword => "password",
            Self::Persona(_) => "persona",
        }
    }
}

/// Raw registration inputs, typically straight from a request body.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationParts<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub persona: &'a str,
}

/// Validated signup request.
///
/// Names are display strings and only trimmed. Email is normalised (see
/// [`EmailAddress`]); the password is held in zeroising memory until hashed.
#[derive(Debug, Clone)]
pub struct Registration {
    first_name: String,
    last_name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
    persona: Persona,
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{Registration, RegistrationParts};
    ///
    /// let registration = Registration::try_from_parts(RegistrationParts {
    ///     first_name: "Ada",
    ///     last_name: "Lovelace",
    ///     email: "Ada@Example.com",
    ///     password: "p@ss1",
    ///     persona: "creator",
    /// })
    /// .unwrap();
    /// assert_eq!(registration.email().as_ref(), "ada@example.com");
    /// ```
    pub fn try_from_parts(parts: RegistrationParts<'_>) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::parse(parts.email).map_err(RegistrationValidationError::Email)?;
        if parts.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let persona = Persona::new(parts.persona).map_err(RegistrationValidationError::Persona)?;
        Ok(Self {
            first_name: parts.first_name.trim().to_owned(),
            last_name: parts.last_name.trim().to_owned(),
            email,
            password: Zeroizing::new(parts.password.to_owned()),
            persona,
        })
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }
}

/// Identity bound to a session token at issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: EmailAddress,
    pub persona: Persona,
}

/// Opaque signed session credential. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub token: SessionToken,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn parts<'a>(email: &'a str, password: &'a str, persona: &'a str) -> RegistrationParts<'a> {
        RegistrationParts {
            first_name: " Ada ",
            last_name: "Lovelace",
            email,
            password,
            persona,
        }
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("a@x.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_login_inputs(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts("a@x.com", " spaced ").expect("valid");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    #[case(parts("", "pw", "creator"), "email")]
    #[case(parts("nope", "pw", "creator"), "email")]
    #[case(parts("a@x.com", "", "creator"), "password")]
    #[case(parts("a@x.com", "pw", " "), "persona")]
    fn invalid_registrations_name_the_field(
        #[case] input: RegistrationParts<'static>,
        #[case] field: &str,
    ) {
        let err = Registration::try_from_parts(input).expect_err("invalid registration");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn registration_trims_names_and_normalises_email() {
        let registration =
            Registration::try_from_parts(parts(" A@X.com", "p@ss1", "student")).expect("valid");
        assert_eq!(registration.first_name(), "Ada");
        assert_eq!(registration.email().as_ref(), "a@x.com");
        assert_eq!(registration.password(), "p@ss1");
        assert_eq!(registration.persona().as_ref(), "student");
    }

    #[rstest]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("header.claims.signature");
        assert_eq!(format!("{token:?}"), "SessionToken(<redacted>)");
    }
}
