//! Backend entry-point: loads configuration, wires adapters and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal::config::PortalSettings;
use portal::config::secret::{BuildMode, load_signing_secret};
use portal::inbound::http::health::HealthState;
use server::{ServerConfig, create_server, drain_on, shutdown_signal};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load()
        .map_err(|error| std::io::Error::other(format!("configuration: {error}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let jwt = settings.jwt_settings().map_err(std::io::Error::other)?;
    let secret = load_signing_secret(
        &settings.token_secret_file(),
        BuildMode::from_debug_assertions(),
        settings.allow_ephemeral_secret,
    )
    .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(bind_addr, secret, jwt).with_hash_cost(settings.hash_cost());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    actix_web::rt::spawn(drain_on(health_state, server.handle(), shutdown_signal()));
    info!(%bind_addr, "portal listening");
    server.await
}
