use anyhow::{Context, Result};
use travelai_gateway::{GatewayConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside development
    let dotenv_path = dotenv::dotenv().ok();

    let config = GatewayConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }
    for name in config.credentials.missing() {
        tracing::warn!("{name} is not set; requests to that provider will be rejected upstream");
    }

    web::run(config).await
}
