//! Argon2id adapter for the [`PasswordHasher`] port.
//!
//! Hashes are stored in PHC string format, so each one carries its own salt
//! and cost parameters. Verification reads the parameters from the stored
//! hash, which keeps old hashes valid when the configured cost changes.

use argon2::password_hash::{
    self as phc, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id hasher running its work on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Build a hasher, rejecting cost parameters Argon2 does not accept.
    pub fn new(cost: HashCost) -> Result<Self, PasswordHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|error| PasswordHashError::configuration(error.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn join_error(error: task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.to_owned());
        let encoded = task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|error| PasswordHashError::hashing(error.to_string()))
        })
        .await
        .map_err(join_error)??;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        task::spawn_blocking(move || {
            let parsed = phc::PasswordHash::new(&encoded)
                .map_err(|error| PasswordHashError::malformed_hash(error.to_string()))?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(phc::Error::Password) => Ok(false),
                Err(error) => Err(PasswordHashError::hashing(error.to_string())),
            }
        })
        .await
        .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("cheap test cost is valid")
    }

    #[rstest]
    #[tokio::test]
    async fn hash_verifies_only_the_original_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("p@ss1").await.expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("p@ss1"));
        assert!(hasher.verify("p@ss1", &hash).await.expect("verify"));
        assert!(!hasher.verify("p@ss2", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn equal_passwords_get_distinct_salts(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("same").await.expect("hash");
        let second = hasher.hash("same").await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_from_another_cost_still_verify(hasher: Argon2PasswordHasher) {
        let stronger = Argon2PasswordHasher::new(HashCost {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .expect("valid cost");
        let hash = stronger.hash("p@ss1").await.expect("hash");
        assert!(hasher.verify("p@ss1", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_an_error(hasher: Argon2PasswordHasher) {
        let error = hasher
            .verify("p@ss1", &PasswordHash::new("not-a-phc-string"))
            .await
            .expect_err("malformed");
        assert!(matches!(error, PasswordHashError::MalformedHash { .. }));
    }

    #[rstest]
    fn zero_iterations_are_rejected() {
        let error = Argon2PasswordHasher::new(HashCost {
            iterations: 0,
            ..HashCost::default()
        })
        .expect_err("invalid cost");
        assert!(matches!(error, PasswordHashError::Configuration { .. }));
    }
}
