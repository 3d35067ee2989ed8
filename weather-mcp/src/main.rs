//! weather-mcp: MCP server for current weather and forecasts.
//!
//! Run with: `weather-mcp` (serves on stdio). The OpenWeather key comes from
//! the `weather configure` config file or `OPENWEATHER_API_KEY`.

use rmcp::ServiceExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, WeatherService};

mod server;

use server::WeatherServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Weather MCP Server with OpenWeather");

    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let service = WeatherServer::new(service)
        .serve(rmcp::transport::stdio())
        .await?;
    let reason = service.waiting().await?;

    tracing::info!(?reason, "Weather MCP Server stopped");
    Ok(())
}
