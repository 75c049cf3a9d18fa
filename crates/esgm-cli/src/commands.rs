//! `esgm serve` and `esgm migrate`.

use esgm_api::{AppState, Server};
use esgm_core::config::DEV_JWT_SECRET;
use esgm_core::{ConfigManager, EsgmConfig};
use esgm_store::Store;

use crate::Result;

/// Load the configuration, apply command-line overrides, and validate it.
pub fn load_config(
    config_path: Option<&str>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<EsgmConfig> {
    let mut config = EsgmConfig::load(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;
    if config.auth.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("Using the development JWT secret; set ESGM_JWT_SECRET before deploying");
    }
    Ok(config)
}

/// Open the configured database and bring its schema up to date.
pub async fn open_store(config: &EsgmConfig) -> Result<Store> {
    let store = Store::open(&config.database.path)?;
    store.migrate().await?;
    tracing::info!(path = %config.database.path, "Database ready");
    Ok(store)
}

/// Open the store, build the server state, and pick up evaluations a
/// previous run left `PROCESSING`.
pub async fn prepare_state(config: EsgmConfig) -> Result<AppState> {
    let store = open_store(&config).await?;
    let state = AppState::new(config, store)?;
    state.dispatcher.resume_interrupted().await?;
    Ok(state)
}

/// Run the API server until Ctrl-C or SIGTERM.
pub async fn serve(config: EsgmConfig) -> Result<()> {
    let state = prepare_state(config).await?;
    Server::new(state).run().await?;
    Ok(())
}

/// Create the schema and seed the key issues, then exit.
pub async fn migrate(config: &EsgmConfig) -> Result<()> {
    let store = open_store(config).await?;
    let issues = store.key_issues().await?;
    println!(
        "Database at {} is up to date ({} key issues)",
        config.database.path,
        issues.len()
    );
    Ok(())
}
