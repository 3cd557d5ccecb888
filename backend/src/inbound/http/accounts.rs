//! Account API handlers.
//!
//! ```text
//! POST /auth/register {"firstName":"Ada","lastName":"Lovelace","email":"a@x.com","password":"p@ss1","persona":"creator"}
//! POST /auth/login {"email":"a@x.com","password":"p@ss1"}
//! GET /auth/session  (Authorization: Bearer <token>)
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::AnalyticsEvent;
use crate::domain::{
    AccountError, Error, LoginCredentials, Registration, RegistrationParts, SessionUser, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::BearerToken;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /auth/register`.
///
/// Missing fields deserialise as empty strings so validation can name them.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub persona: String,
}

impl RegisterRequest {
    fn parts(&self) -> RegistrationParts<'_> {
        RegistrationParts {
            first_name: &self.first_name,
            last_name: &self.last_name,
            email: &self.email,
            password: &self.password,
            persona: &self.persona,
        }
    }
}

/// Body returned by `POST /auth/register`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
}

/// Login request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an authenticated identity.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUserBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "creator")]
    pub persona: String,
}

impl From<SessionUser> for SessionUserBody {
    fn from(value: SessionUser) -> Self {
        Self {
            id: value.id,
            email: value.email.into(),
            persona: value.persona.into(),
        }
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: SessionUserBody,
}

/// Body returned by `GET /auth/session`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub user: SessionUserBody,
}

async fn record_analytics(state: &HttpState, event: AnalyticsEvent) {
    let name = event.name.clone();
    if let Err(error) = state.analytics.record_event(event).await {
        warn!(%error, event = %name, "analytics event dropped");
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or duplicate email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let registration = Registration::try_from_parts(payload.parts()).map_err(AccountError::from)?;
    let user_id = state.registration.register(registration).await?;

    let event = AnalyticsEvent::new("user_registered", state.clock.utc())
        .with_property("userId", user_id.to_string());
    record_analytics(&state, event).await;

    Ok(web::Json(RegisterResponse {
        success: true,
        user_id,
    }))
}

/// Exchange email and password for a session token.
///
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(AccountError::from)?;
    let session = state.login.authenticate(&credentials).await?;

    let event = AnalyticsEvent::new("user_logged_in", state.clock.utc())
        .with_property("userId", session.user.id.to_string());
    record_analytics(&state, event).await;

    Ok(web::Json(LoginResponse {
        success: true,
        token: session.token.into(),
        user: session.user.into(),
    }))
}

/// Identity behind the presented bearer token.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session is valid", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession",
    security(("BearerToken" = []))
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<SessionResponse>> {
    let user = state.sessions.resolve(token.as_str()).await?;
    Ok(web::Json(SessionResponse {
        success: true,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests;
