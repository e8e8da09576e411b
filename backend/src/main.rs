//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API, health probes and (in debug builds) OpenAPI docs.

mod server;

use actix_web::web;
use chrono::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mindspace::inbound::http::health::HealthState;
use mindspace::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use ortho_config::OrthoConfig;

use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let ttl_days = settings.token_ttl_days().map_err(std::io::Error::other)?;
    let (secret, is_fallback) = settings.jwt_secret().map_err(std::io::Error::other)?;
    if is_fallback {
        warn!("MINDSPACE_JWT_SECRET not set; using development signing key (dev only)");
    }

    let config = ServerConfig::new(bind_addr, secret.into_bytes())
        .with_token_ttl(Duration::days(i64::from(ttl_days)));

    let Some(database_url) = settings.database_url.as_deref() else {
        if cfg!(debug_assertions) {
            warn!("MINDSPACE_DATABASE_URL not set; data will not survive a restart (dev only)");
            return Ok(config);
        }
        return Err(std::io::Error::other(
            "MINDSPACE_DATABASE_URL must be set in release builds",
        ));
    };

    if settings.run_migrations() {
        run_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    }
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    Ok(config.with_db_pool(pool))
}
