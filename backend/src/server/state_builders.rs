//! Builders wiring outbound adapters into the account service and HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use portal::domain::{AccountService, AccountServicePorts};
use portal::inbound::http::state::{HttpState, HttpStatePorts};
use portal::outbound::crypto::{Argon2PasswordHasher, JwtSessionTokens};
use portal::outbound::logging::TracingAuditLog;
use portal::outbound::memory::{InMemoryAnalyticsSink, InMemoryUserRepository};

use super::ServerConfig;

/// Account service backed by the in-memory store, Argon2id and HS256 tokens.
///
/// # Errors
/// Returns [`std::io::Error`] when the configured hash cost is rejected.
pub(super) fn build_account_service(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<AccountService> {
    let hasher = Argon2PasswordHasher::new(config.hash_cost)
        .map_err(|error| std::io::Error::other(format!("password hasher: {error}")))?;
    let tokens = JwtSessionTokens::new(
        config.signing_secret.as_bytes(),
        config.jwt.clone(),
        clock.clone(),
    );
    Ok(AccountService::new(AccountServicePorts {
        users: Arc::new(InMemoryUserRepository::new()),
        hasher: Arc::new(hasher),
        tokens: Arc::new(tokens),
        audit: Arc::new(TracingAuditLog),
        clock,
    }))
}

/// HTTP state around a warmed account service.
///
/// # Errors
/// Returns [`std::io::Error`] when the service cannot be built or warmed.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = build_account_service(config, clock.clone())?;
    service
        .warm_up()
        .await
        .map_err(|error| std::io::Error::other(format!("account service: {error}")))?;
    let service = Arc::new(service);
    Ok(HttpState::new(HttpStatePorts {
        registration: service.clone(),
        login: service.clone(),
        sessions: service,
        analytics: Arc::new(InMemoryAnalyticsSink::new()),
        clock,
    }))
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use std::net::SocketAddr;

    use chrono::TimeDelta;
    use portal::config::secret::{BuildMode, load_signing_secret};
    use portal::domain::ports::RegistrationService;
    use portal::domain::{Registration, RegistrationParts};
    use portal::outbound::crypto::{HashCost, JwtSettings};
    use rstest::rstest;

    pub(in crate::server) fn config(hash_cost: HashCost) -> ServerConfig {
        let missing = std::env::temp_dir().join("portal-no-such-secret");
        let secret = load_signing_secret(&missing, BuildMode::Debug, true).expect("ephemeral");
        ServerConfig::new(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            secret,
            JwtSettings {
                issuer: "portal".to_owned(),
                ttl: TimeDelta::hours(2),
            },
        )
        .with_hash_cost(hash_cost)
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_hash_cost_fails_startup() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        let result = build_http_state(&config(cost)).await;
        assert!(result.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn built_service_registers_accounts() {
        let cost = HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        };
        let service =
            build_account_service(&config(cost), Arc::new(DefaultClock)).expect("service");
        let registration = Registration::try_from_parts(RegistrationParts {
            first_name: "Ada",
            last_name: "Lovelace",
            email: "ada@example.com",
            password: "p@ss1",
            persona: "creator",
        })
        .expect("valid registration");

        assert!(service.register(registration).await.is_ok());
    }
}
