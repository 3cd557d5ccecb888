//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod bearer;
pub mod error;
pub mod health;
pub mod state;

use actix_web::web;
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor settings that report unreadable bodies with the standard
/// error envelope instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _request| {
        debug!(%error, "rejected request body");
        Error::invalid_request(format!("invalid JSON body: {error}")).into()
    })
}

/// Register the account and health endpoints on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::current_session)
        .service(health::health)
        .service(health::ready)
        .service(health::live);
}
