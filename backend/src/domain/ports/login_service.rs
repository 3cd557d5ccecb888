//! Driving ports for login and session lookup.
//!
//! Inbound adapters call these without knowing how accounts are stored or how
//! tokens are signed, so handler tests can substitute deterministic doubles.

use async_trait::async_trait;

use crate::domain::{AccountError, AuthenticatedSession, LoginCredentials, SessionUser};

/// Use-case port for authenticating credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate and issue a session token.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// [`AccountError::InvalidCredentials`].
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, AccountError>;
}

/// Use-case port for resolving a presented session token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Return the identity bound to `token`, or [`AccountError::InvalidSession`].
    async fn resolve(&self, token: &str) -> Result<SessionUser, AccountError>;
}
