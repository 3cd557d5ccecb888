//! Token signing-secret loading.
//!
//! The secret is read from a file. When the file is unreadable, debug builds
//! (or deployments that opt in) fall back to a random per-process secret,
//! which invalidates every issued token on restart.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::fingerprint::secret_fingerprint;

/// Shortest secret accepted from disk.
pub const SIGNING_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode deciding whether a missing secret file is fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and generate one.
    Debug,
    /// Release builds require the secret file unless ephemeral secrets are
    /// explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC key material for session tokens. Zeroed on drop.
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Truncated SHA-256 fingerprint, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        secret_fingerprint(self.as_bytes())
    }

    fn ephemeral() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        OsRng.fill_bytes(bytes.as_mut_slice());
        Self(bytes)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum SecretError {
    /// Reading the secret file failed and no fallback was permitted.
    #[error("failed to read token secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is shorter than the minimum.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the signing secret from `path`.
///
/// # Examples
///
/// ```rust
/// use portal::config::secret::{BuildMode, load_signing_secret};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = std::env::temp_dir().join("portal_secret_example");
/// std::fs::write(&path, vec![b'k'; 48])?;
///
/// let secret = load_signing_secret(&path, BuildMode::Release, false)?;
/// assert_eq!(secret.as_bytes().len(), 48);
///
/// std::fs::remove_file(&path)?;
/// # Ok(())
/// # }
/// ```
pub fn load_signing_secret(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<SigningSecret, SecretError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length < SIGNING_SECRET_MIN_LEN {
                return Err(SecretError::TooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SIGNING_SECRET_MIN_LEN,
                });
            }
            let secret = SigningSecret(bytes);
            info!(
                path = %path.display(),
                fingerprint = %secret.fingerprint(),
                "token signing secret loaded"
            );
            Ok(secret)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            let secret = SigningSecret::ephemeral();
            warn!(
                path = %path.display(),
                error = %error,
                fingerprint = %secret.fingerprint(),
                "using temporary token secret (dev only)"
            );
            Ok(secret)
        }
        Err(error) => Err(SecretError::Read {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}
