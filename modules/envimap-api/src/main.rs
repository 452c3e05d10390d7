use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use envimap_api::traits::{EnvironmentReadings, UnconfiguredReadings};
use envimap_api::{router, AppState, AreaAnalyzer};
use envimap_common::Config;
use nominatim_client::NominatimClient;
use openweather_client::OpenWeatherClient;
use overpass_client::OverpassClient;

#[tokio::main]
async fn main() -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for directive in [
        "envimap=info",
        "ai_client=info",
        "nominatim_client=info",
        "overpass_client=info",
        "openweather_client=info",
    ] {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let readings: Arc<dyn EnvironmentReadings> = match &config.openweather_api_key {
        Some(key) => Arc::new(OpenWeatherClient::new(key.clone())),
        None => {
            warn!("OPENWEATHER_API_KEY not set, air quality and weather will be unavailable");
            Arc::new(UnconfiguredReadings)
        }
    };

    let analyzer = AreaAnalyzer::new(
        Arc::new(NominatimClient::new()),
        Arc::new(OverpassClient::new()),
        readings,
        Arc::new(Gemini::new(
            config.google_api_key.clone(),
            config.gemini_model.clone(),
        )),
    );

    let app = router(Arc::new(AppState { analyzer }));

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("EnviMap API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
