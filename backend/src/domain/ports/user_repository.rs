//! Port abstraction for the account store.
//!
//! Adapters must make [`UserRepository::insert`] atomic with respect to the
//! email key: two concurrent inserts for the same email must not both succeed.
use async_trait::async_trait;

use crate::domain::{EmailAddress, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account store adapters.
    pub enum UserPersistenceError {
        /// An account with this email is already stored.
        DuplicateEmail { email: String } => "an account already exists for {email}",
        /// Store connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, failing with `DuplicateEmail` if the email is taken.
    async fn insert(&self, account: UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Whether an account exists for `email`.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
