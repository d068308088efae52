// HTTP API server binary for vitidata
// Serves the five viticulture statistics domains with CSV fallback.

use anyhow::Result;
use vitidata::api::ApiServer;
use vitidata::config::AppConfig;
use vitidata::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    vitidata::tracing::init_tracing("info")?;

    tracing::info!("Initializing vitidata API server");

    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();

    let config = AppConfig::from_env();
    let server = ApiServer::from_env()?;

    server.run(config).await
}
