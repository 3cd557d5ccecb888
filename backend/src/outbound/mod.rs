//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local account store and analytics sink
//! - **crypto**: Argon2id password hashing and JWT session tokens
//! - **logging**: audit log written through `tracing`
//!
//! Adapters translate between domain types and their backing technology and
//! contain no business rules.

pub mod crypto;
pub mod logging;
pub mod memory;
