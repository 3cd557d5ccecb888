//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed account and session values, the account
//! service that implements the driving ports, the in-process event bus and
//! the document pipeline. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-neutral error payload and stable code.
//! - UserAccount, EmailAddress, Persona, UserId: account data model.
//! - Registration, LoginCredentials, SessionUser, SessionToken: auth inputs
//!   and outputs.
//! - AccountService / AccountError: register, authenticate, resolve session.
//! - EventBus: publish/subscribe registry and the auth-panel signal.
//! - DocumentPipeline: PDF extraction on file-created notifications.

pub mod accounts;
pub mod auth;
pub mod documents;
pub mod error;
pub mod events;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountError, AccountService, AccountServicePorts};
pub use self::auth::{
    AuthenticatedSession, LoginCredentials, LoginValidationError, Registration, RegistrationParts,
    RegistrationValidationError, SessionToken, SessionUser,
};
pub use self::documents::{DocumentPipeline, FileCreated, PipelineOutcome, SkipReason};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{AuthPanelMode, EventBus, Listener, OPEN_AUTH_PANEL, Subscription};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUserAccount, PasswordHash, Persona, UserAccount, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
