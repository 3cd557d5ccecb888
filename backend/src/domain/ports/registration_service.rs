//! Driving port for account signup.

use async_trait::async_trait;

use crate::domain::{AccountError, Registration, UserId};

/// Use-case port for registering new accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account and return its identifier.
    ///
    /// Fails with [`AccountError::DuplicateAccount`] when the email is taken.
    async fn register(&self, registration: Registration) -> Result<UserId, AccountError>;
}
