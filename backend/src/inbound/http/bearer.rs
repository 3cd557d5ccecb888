//! `Authorization: Bearer <token>` extractor.
//!
//! Keeps header parsing out of handlers; a missing or malformed header is
//! rejected with `401 Unauthorized` before the handler runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw token taken from the `Authorization` header.
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn parse(header: Option<&str>) -> Result<Self, Error> {
        let raw = header.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
        let token = raw
            .trim()
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
        Ok(Self(token.to_owned()))
    }
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(Self::parse(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("  Bearer   spaced  ", "spaced")]
    fn well_formed_headers_yield_the_token(#[case] header: &str, #[case] expected: &str) {
        let token = BearerToken::parse(Some(header)).expect("token");
        assert_eq!(token.as_str(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Bearer "))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("bearer lowercase-scheme"))]
    fn other_headers_are_unauthorized(#[case] header: Option<&str>) {
        let error = BearerToken::parse(header).err().expect("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
