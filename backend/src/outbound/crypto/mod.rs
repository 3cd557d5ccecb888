//! Cryptographic adapters: password hashing and session-token signing.

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::{Argon2PasswordHasher, HashCost};
pub use jwt::{JwtSessionTokens, JwtSettings};
