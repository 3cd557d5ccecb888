//! Service configuration loaded via OrthoConfig.
//!
//! Every value is optional; accessors supply the defaults. Environment
//! variables use the `PORTAL_` prefix, e.g. `PORTAL_BIND_ADDR`.

pub mod fingerprint;
pub mod secret;

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::crypto::{HashCost, JwtSettings};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/token_secret";
const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;
const MAX_TOKEN_TTL_SECS: i64 = 366 * 24 * 60 * 60;
const DEFAULT_TOKEN_ISSUER: &str = "portal";

/// Configuration values for the portal backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// File holding the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Permit a random per-process secret when the file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: Option<i64>,
    /// `iss` claim stamped into and required on session tokens.
    pub token_issuer: Option<String>,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 iteration count.
    pub hash_iterations: Option<u32>,
    /// Argon2 lane count.
    pub hash_parallelism: Option<u32>,
}

/// Invalid configuration values.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}'")]
    BindAddr { value: String },
    #[error("token ttl must be between 1 second and 366 days, got {value}")]
    TokenTtl { value: i64 },
}

impl PortalSettings {
    /// Address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn token_secret_file(&self) -> PathBuf {
        self.token_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_SECRET_FILE))
    }

    /// Issuer and lifetime for session tokens.
    pub fn jwt_settings(&self) -> Result<JwtSettings, SettingsError> {
        let ttl_secs = self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let ttl = Some(ttl_secs)
            .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
            .and_then(TimeDelta::try_seconds)
            .ok_or(SettingsError::TokenTtl { value: ttl_secs })?;
        Ok(JwtSettings {
            issuer: self
                .token_issuer
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.to_owned()),
            ttl,
        })
    }

    /// Argon2 cost parameters; unset values take the library defaults.
    pub fn hash_cost(&self) -> HashCost {
        let defaults = HashCost::default();
        HashCost {
            memory_kib: self.hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.hash_iterations.unwrap_or(defaults.iterations),
            parallelism: self.hash_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}
