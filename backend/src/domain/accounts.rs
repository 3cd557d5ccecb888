//! Account service: registration, authentication and session lookup.
//!
//! The service implements the driving ports on top of the account store,
//! password hasher and token issuer ports. Store and hasher failures are
//! recorded through the [`AuditLog`] port and surface to callers only as
//! [`AccountError::Internal`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::ports::{
    AuditLog, LogEntry, LoginService, PasswordHashError, PasswordHasher, RegistrationService,
    SessionResolver, SessionTokens, Severity, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticatedSession, EmailAddress, Error, ErrorCode, LoginCredentials, LoginValidationError,
    NewUserAccount, PasswordHash, Registration, RegistrationValidationError, SessionUser,
    UserAccount, UserId,
};

/// Password hashed once and used to burn a verification when the email is
/// unknown, so both login failures cost about the same.
const DUMMY_PASSWORD: &str = "portal-unknown-account";

/// Typed failures returned by the account use cases.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// A request field failed validation.
    #[error("{field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
    /// The email is already registered.
    #[error("an account with this email already exists")]
    DuplicateAccount,
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Session token was missing, tampered with or expired.
    #[error("session is invalid or has expired")]
    InvalidSession,
    /// Storage, hashing or signing failed. The message is for logs only.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<RegistrationValidationError> for AccountError {
    fn from(value: RegistrationValidationError) -> Self {
        Self::InvalidInput {
            field: value.field(),
            message: value.to_string(),
        }
    }
}

impl From<LoginValidationError> for AccountError {
    fn from(_: LoginValidationError) -> Self {
        Self::InvalidCredentials
    }
}

impl From<AccountError> for Error {
    fn from(value: AccountError) -> Self {
        let summary = value.to_string();
        match value {
            AccountError::InvalidInput { field, message } => {
                Error::invalid_request(message).with_details(json!({ "field": field }))
            }
            AccountError::DuplicateAccount => Error::duplicate_account(summary),
            AccountError::InvalidCredentials => Error::invalid_credentials(summary),
            AccountError::InvalidSession => Error::unauthorized(summary),
            AccountError::Internal { message } => {
                Error::try_new(ErrorCode::InternalError, message)
                    .unwrap_or_else(|_| Error::internal(summary))
            }
        }
    }
}

/// Collaborators the account service depends on.
#[derive(Clone)]
pub struct AccountServicePorts {
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn SessionTokens>,
    pub audit: Arc<dyn AuditLog>,
    pub clock: Arc<dyn Clock>,
}

/// Implements [`RegistrationService`], [`LoginService`] and
/// [`SessionResolver`].
#[derive(Clone)]
pub struct AccountService {
    ports: AccountServicePorts,
    dummy_hash: Arc<OnceCell<PasswordHash>>,
}

impl AccountService {
    pub fn new(ports: AccountServicePorts) -> Self {
        Self {
            ports,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    fn internal(&self, operation: &'static str, error: impl fmt::Display) -> AccountError {
        let message = error.to_string();
        self.ports.audit.record(
            LogEntry::new(Severity::Error, self.ports.clock.utc())
                .with_field("operation", operation)
                .with_field("error", message.clone()),
        );
        AccountError::Internal { message }
    }

    fn map_store_error(&self, operation: &'static str, error: UserPersistenceError) -> AccountError {
        match error {
            UserPersistenceError::DuplicateEmail { .. } => AccountError::DuplicateAccount,
            other => self.internal(operation, other),
        }
    }

    /// Hash the dummy password used for unknown-account logins.
    ///
    /// Called once at startup so the first rejected login costs the same
    /// as every other one. Later calls are no-ops.
    pub async fn warm_up(&self) -> Result<(), AccountError> {
        self.dummy_hash()
            .await
            .map(|_| ())
            .map_err(|error| self.internal("warm_up", error))
    }

    async fn dummy_hash(&self) -> Result<&PasswordHash, PasswordHashError> {
        let hasher = &self.ports.hasher;
        self.dummy_hash
            .get_or_try_init(|| async { hasher.hash(DUMMY_PASSWORD).await })
            .await
    }

    /// Run one verification against the dummy hash and discard the outcome.
    async fn burn_verification(&self, password: &str) {
        let outcome = match self.dummy_hash().await {
            Ok(hash) => self.ports.hasher.verify(password, hash).await.map(|_| ()),
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            self.internal("authenticate", error);
        }
    }

    async fn find_for_login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<UserAccount>, AccountError> {
        let Ok(email) = EmailAddress::parse(credentials.email()) else {
            return Ok(None);
        };
        self.ports
            .users
            .find_by_email(&email)
            .await
            .map_err(|error| self.internal("authenticate", error))
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, registration: Registration) -> Result<UserId, AccountError> {
        let users = &self.ports.users;
        if users
            .exists_by_email(registration.email())
            .await
            .map_err(|error| self.map_store_error("register", error))?
        {
            return Err(AccountError::DuplicateAccount);
        }

        let password_hash = self
            .ports
            .hasher
            .hash(registration.password())
            .await
            .map_err(|error| self.internal("register", error))?;

        let account = UserAccount::from(NewUserAccount {
            id: UserId::random(),
            first_name: registration.first_name().to_owned(),
            last_name: registration.last_name().to_owned(),
            email: registration.email().clone(),
            password_hash,
            persona: registration.persona().clone(),
            created_at: self.ports.clock.utc(),
        });
        let id = *account.id();
        users
            .insert(account)
            .await
            .map_err(|error| self.map_store_error("register", error))?;

        info!(user_id = %id, persona = %registration.persona(), "account registered");
        Ok(id)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, AccountError> {
        let Some(account) = self.find_for_login(credentials).await? else {
            self.burn_verification(credentials.password()).await;
            debug!("login rejected");
            return Err(AccountError::InvalidCredentials);
        };

        let verified = self
            .ports
            .hasher
            .verify(credentials.password(), account.password_hash())
            .await
            .map_err(|error| self.internal("authenticate", error))?;
        if !verified {
            debug!("login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        let user = SessionUser {
            id: *account.id(),
            email: account.email().clone(),
            persona: account.persona().clone(),
        };
        let token = self
            .ports
            .tokens
            .issue(&user)
            .map_err(|error| self.internal("authenticate", error))?;
        info!(user_id = %user.id, "session issued");
        Ok(AuthenticatedSession { token, user })
    }
}

#[async_trait]
impl SessionResolver for AccountService {
    async fn resolve(&self, token: &str) -> Result<SessionUser, AccountError> {
        let user = self.ports.tokens.verify(token).map_err(|error| {
            debug!(%error, "session token rejected");
            AccountError::InvalidSession
        })?;
        let account = self
            .ports
            .users
            .find_by_id(&user.id)
            .await
            .map_err(|error| self.internal("resolve_session", error))?;
        match account {
            Some(_) => Ok(user),
            None => Err(AccountError::InvalidSession),
        }
    }
}
