//! HS256 JWT adapter for the [`SessionTokens`] port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tests can move time forward deterministically.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{SessionTokenError, SessionTokens};
use crate::domain::{EmailAddress, Persona, SessionToken, SessionUser, UserId};

/// Issuer name and lifetime stamped into every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub issuer: String,
    pub ttl: TimeDelta,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    persona: String,
    iss: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Signs and verifies session tokens with a shared secret.
pub struct JwtSessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: JwtSettings,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    pub fn new(secret: &[u8], settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            settings,
            clock,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, user: &SessionUser) -> Result<SessionToken, SessionTokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at
            .checked_add_signed(self.settings.ttl)
            .ok_or_else(|| SessionTokenError::signing("token expiry out of range"))?;
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            persona: user.persona.to_string(),
            iss: self.settings.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken::new)
            .map_err(|error| SessionTokenError::signing(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionUser, SessionTokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| SessionTokenError::invalid(error.to_string()))?
            .claims;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(SessionTokenError::expired());
        }
        let id = UserId::new(&claims.sub)
            .map_err(|error| SessionTokenError::invalid(format!("sub: {error}")))?;
        let email = EmailAddress::parse(&claims.email)
            .map_err(|error| SessionTokenError::invalid(format!("email: {error}")))?;
        let persona = Persona::new(&claims.persona)
            .map_err(|error| SessionTokenError::invalid(format!("persona: {error}")))?;
        Ok(SessionUser { id, email, persona })
    }
}
