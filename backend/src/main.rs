//! Backend entry-point: loads settings, picks adapters, and serves the REST
//! API, crawler documents, health checks, and OpenAPI docs.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use server::{ServerConfig, Storage, create_server};
use whoami::inbound::http::health::HealthState;
use whoami::inbound::http::session_config::fingerprint::key_fingerprint;
use whoami::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use whoami::outbound::identity::UserinfoIdentityProvider;
use whoami::outbound::memory::InMemoryStore;
use whoami::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use whoami::settings::AppSettings;

const IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;

    let session = session_settings(
        &SessionToggles::from(&settings),
        BuildMode::from_debug_assertions(),
    )?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let storage = build_storage(&settings).await?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        storage,
    )
    .with_feed_cache_ttl(settings.feed_cache_ttl())
    .with_public_base_url(settings.public_base_url());

    if let Some(raw) = settings.identity_userinfo_url() {
        let endpoint =
            Url::parse(raw).wrap_err_with(|| format!("invalid identity userinfo URL '{raw}'"))?;
        let provider = UserinfoIdentityProvider::new(endpoint, IDENTITY_TIMEOUT)
            .wrap_err("failed to build identity provider client")?;
        config = config.with_identity_provider(provider);
    } else if !cfg!(debug_assertions) {
        return Err(eyre!(
            "identity userinfo URL is required in release builds"
        ));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

async fn build_storage(settings: &AppSettings) -> Result<Storage> {
    let Some(url) = settings.database_url() else {
        warn!("no database URL configured; using in-memory storage");
        return Ok(Storage::Memory(Arc::new(InMemoryStore::new(Arc::new(
            DefaultClock,
        )))));
    };
    if settings.run_migrations() {
        run_pending_migrations(url).await?;
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .wrap_err("failed to build database pool")?;
    info!(
        max_connections = settings.db_max_connections(),
        "database pool ready"
    );
    Ok(Storage::Database(pool))
}
