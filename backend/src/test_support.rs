//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use sha2::{Digest, Sha256};

use crate::domain::ports::{AnalyticsSink, AuditLog, LogEntry, PasswordHashError, PasswordHasher};
use crate::domain::{AccountService, AccountServicePorts, PasswordHash};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::crypto::{JwtSessionTokens, JwtSettings};
use crate::outbound::memory::InMemoryUserRepository;

/// Signing secret used by test token issuers.
pub const TEST_TOKEN_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

/// Issuer stamped into test tokens.
pub const TEST_TOKEN_ISSUER: &str = "portal";

/// Fixed starting instant for test clocks.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("fixture timestamp is unambiguous"),
    }
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Deterministic, fast stand-in for the Argon2 hasher.
///
/// Stored hashes are `fake$<sha256 hex>`, so they never contain the
/// plaintext. Every `hash` and `verify` call is counted.
#[derive(Debug, Default)]
pub struct FakePasswordHasher {
    hashes: AtomicUsize,
    verifications: AtomicUsize,
}

const FAKE_PREFIX: &str = "fake$";

impl FakePasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `hash` calls so far.
    pub fn hashes(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }

    /// Number of `verify` calls so far.
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }

    fn digest(password: &str) -> String {
        format!("{FAKE_PREFIX}{}", hex::encode(Sha256::digest(password.as_bytes())))
    }
}

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        Ok(PasswordHash::new(Self::digest(password)))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        if !hash.as_str().starts_with(FAKE_PREFIX) {
            return Err(PasswordHashError::malformed_hash("missing fake$ prefix"));
        }
        Ok(Self::digest(password) == hash.as_str())
    }
}

/// Audit log that keeps entries for assertions.
#[derive(Debug, Default)]
pub struct RecordingAuditLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingAuditLog {
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => panic!("audit log mutex"),
        }
    }
}

impl AuditLog for RecordingAuditLog {
    fn record(&self, entry: LogEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(_) => panic!("audit log mutex"),
        }
    }
}

/// Account service wired to in-memory adapters, with handles kept for
/// assertions.
pub struct AccountHarness {
    pub service: AccountService,
    pub users: Arc<InMemoryUserRepository>,
    pub hasher: Arc<FakePasswordHasher>,
    pub tokens: Arc<JwtSessionTokens>,
    pub audit: Arc<RecordingAuditLog>,
    pub clock: Arc<MutableClock>,
}

impl AccountHarness {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(FakePasswordHasher::new());
        let audit = Arc::new(RecordingAuditLog::default());
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let tokens = Arc::new(JwtSessionTokens::new(
            TEST_TOKEN_SECRET,
            JwtSettings {
                issuer: TEST_TOKEN_ISSUER.to_owned(),
                ttl: TimeDelta::hours(2),
            },
            clock.clone(),
        ));
        let service = AccountService::new(AccountServicePorts {
            users: users.clone(),
            hasher: hasher.clone(),
            tokens: tokens.clone(),
            audit: audit.clone(),
            clock: clock.clone(),
        });
        Self {
            service,
            users,
            hasher,
            tokens,
            audit,
            clock,
        }
    }

    /// HTTP state routing every account port to this harness's service.
    pub fn http_state(&self, analytics: Arc<dyn AnalyticsSink>) -> HttpState {
        let service = Arc::new(self.service.clone());
        HttpState::new(HttpStatePorts {
            registration: service.clone(),
            login: service.clone(),
            sessions: service,
            analytics,
            clock: self.clock.clone(),
        })
    }
}

impl Default for AccountHarness {
    fn default() -> Self {
        Self::new()
    }
}
