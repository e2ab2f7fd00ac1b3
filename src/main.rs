use std::path::PathBuf;

use weather_gateway::{GatewayConfig, telemetry, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional path to a TOML config file as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let config = GatewayConfig::load_from_path(config_path)?;
    telemetry::init(&config.logging)?;

    tracing::info!("Starting weather gateway v{}", weather_gateway::VERSION);
    web::run(config).await
}
