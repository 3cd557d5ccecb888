//! HTTP server configuration object.

use std::net::SocketAddr;

use portal::config::secret::SigningSecret;
use portal::outbound::crypto::{HashCost, JwtSettings};

/// Everything `create_server` needs, resolved from settings at startup.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: SigningSecret,
    pub(crate) jwt: JwtSettings,
    pub(crate) hash_cost: HashCost,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: SigningSecret, jwt: JwtSettings) -> Self {
        Self {
            bind_addr,
            signing_secret,
            jwt,
            hash_cost: HashCost::default(),
        }
    }

    /// Override the Argon2 cost parameters.
    #[must_use]
    pub fn with_hash_cost(mut self, hash_cost: HashCost) -> Self {
        self.hash_cost = hash_cost;
        self
    }
}
