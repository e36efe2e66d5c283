use std::sync::Arc;

use asset_vault_api::config::AppConfig;
use asset_vault_api::state::AppState;
use asset_vault_api::store::postgres::PgStore;
use asset_vault_api::store::{AssetStore, UserStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    // A store that cannot be reached at startup is fatal: the process must
    // not begin serving requests against nothing.
    tracing::info!("connecting to store at startup");
    let store = Arc::new(
        PgStore::connect(&config.database_url, config.database_max_connections).await?,
    );
    tracing::info!("store connection established");

    let assets: Arc<dyn AssetStore> = store.clone();
    let users: Arc<dyn UserStore> = store;
    let state = AppState {
        assets,
        users,
        auth: Arc::new(config.auth.clone()),
    };

    let app = asset_vault_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
