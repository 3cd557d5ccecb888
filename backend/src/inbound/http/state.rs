//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AnalyticsSink, LoginService, RegistrationService, SessionResolver};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use portal::inbound::http::state::{HttpState, HttpStatePorts};
    /// use portal::outbound::memory::InMemoryAnalyticsSink;
    /// use portal::test_support::AccountHarness;
    ///
    /// let harness = AccountHarness::new();
    /// let service = Arc::new(harness.service.clone());
    /// let state = HttpState::new(HttpStatePorts {
    ///     registration: service.clone(),
    ///     login: service.clone(),
    ///     sessions: service,
    ///     analytics: Arc::new(InMemoryAnalyticsSink::new()),
    ///     clock: harness.clock.clone(),
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            login,
            sessions,
            analytics,
            clock,
        } = ports;
        Self {
            registration,
            login,
            sessions,
            analytics,
            clock,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
