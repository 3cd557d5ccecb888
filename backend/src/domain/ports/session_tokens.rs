//! Port for issuing and verifying signed session tokens.

use crate::domain::{SessionToken, SessionUser};

use super::define_port_error;

define_port_error! {
    /// Token issuance and verification failures.
    pub enum SessionTokenError {
        /// The token could not be signed.
        Signing { message: String } => "session token signing failed: {message}",
        /// Signature, structure or issuer did not check out.
        Invalid { message: String } => "session token rejected: {message}",
        /// The token is past its expiry.
        Expired => "session token expired",
    }
}

/// Issues tokens bound to one user and verifies them later.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Issue a token for `user`.
    fn issue(&self, user: &SessionUser) -> Result<SessionToken, SessionTokenError>;

    /// Verify `token` and return the identity it was issued for.
    fn verify(&self, token: &str) -> Result<SessionUser, SessionTokenError>;
}
