//! Process-local account store.
//!
//! Accounts are keyed by normalised email. `insert` checks and writes under a
//! single write lock, which makes it the authoritative uniqueness check even
//! when registrations race.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, UserAccount, UserId};

/// [`UserRepository`] backed by a `HashMap` behind an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<EmailAddress, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EmailAddress, UserAccount>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EmailAddress, UserAccount>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.write();
        if accounts.contains_key(account.email()) {
            return Err(UserPersistenceError::duplicate_email(account.email().as_ref()));
        }
        accounts.insert(account.email().clone(), account);
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.read().get(email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .read()
            .values()
            .find(|account| account.id() == id)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        Ok(self.read().contains_key(email))
    }
}
