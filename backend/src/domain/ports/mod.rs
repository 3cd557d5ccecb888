//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches storage, crypto and external
//! collaborators; driving ports are what inbound adapters call. Each driven
//! port exposes a typed error built with `define_port_error!` so adapters map
//! their failures into predictable variants.

mod macros;
pub(crate) use macros::{define_port_error, port_error_ctor};

mod analytics_sink;
mod audit_log;
mod classifier;
mod document_extraction;
mod login_service;
mod password_hasher;
mod registration_service;
mod session_tokens;
mod text_generator;
mod user_repository;

pub use analytics_sink::{AnalyticsError, AnalyticsEvent, AnalyticsSink, TimeRange};
pub use audit_log::{AuditLog, LogEntry, Severity};
pub use classifier::{Classification, Classifier, ClassifierError, FallbackClassifier};
#[cfg(test)]
pub use document_extraction::{MockDocumentExtractor, MockDocumentStore};
pub use document_extraction::{
    DocumentError, DocumentExtractor, DocumentStore, ExtractedDocument, StoredFile,
};
#[cfg(test)]
pub use login_service::{MockLoginService, MockSessionResolver};
pub use login_service::{LoginService, SessionResolver};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokenError, SessionTokens};
pub use text_generator::{GenerationError, TextGenerator};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
