// Trait seams for the orchestrator's collaborators.
//
// Geocoder, FeatureSource, EnvironmentReadings and TextModel each wrap one
// external service. Production wires in the real clients; tests wire in the
// mocks from `testing.rs` so an analysis runs with no network.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ai_client::{Agent, Gemini, PromptBuilder};
use envimap_common::{Coordinate, RawFeature};
use nominatim_client::{GeocodedPlace, NominatimClient, PlaceName};
use openweather_client::{AirQuality, CurrentWeather, OpenWeatherClient, OpenWeatherError};
use overpass_client::{FeatureQuery, OverpassClient};

// ---------------------------------------------------------------------------
// Geocoder
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-text place, or `None` when nothing matched.
    async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>>;

    /// City and area names for a coordinate.
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceName>;
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>> {
        Ok(self.search(query).await?)
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceName> {
        Ok(self.reverse(coordinate).await?)
    }
}

// ---------------------------------------------------------------------------
// FeatureSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Emission-source features around a point.
    async fn features_around(&self, center: Coordinate) -> Result<Vec<RawFeature>>;
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn features_around(&self, center: Coordinate) -> Result<Vec<RawFeature>> {
        Ok(self.fetch_features(&FeatureQuery::around(center)).await?)
    }
}

// ---------------------------------------------------------------------------
// EnvironmentReadings
// ---------------------------------------------------------------------------

#[async_trait]
pub trait EnvironmentReadings: Send + Sync {
    /// Current air quality; `Ok(None)` when the service has no reading for the point.
    async fn air_quality(&self, at: Coordinate) -> Result<Option<AirQuality>>;

    async fn weather(&self, at: Coordinate) -> Result<CurrentWeather>;
}

#[async_trait]
impl EnvironmentReadings for OpenWeatherClient {
    async fn air_quality(&self, at: Coordinate) -> Result<Option<AirQuality>> {
        match self.air_quality(at).await {
            Ok(reading) => Ok(Some(reading)),
            Err(OpenWeatherError::NoData) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn weather(&self, at: Coordinate) -> Result<CurrentWeather> {
        Ok(self.current_weather(at).await?)
    }
}

/// Stand-in used when no OpenWeather credential is configured.
pub struct UnconfiguredReadings;

#[async_trait]
impl EnvironmentReadings for UnconfiguredReadings {
    async fn air_quality(&self, _at: Coordinate) -> Result<Option<AirQuality>> {
        Err(anyhow!("OPENWEATHER_API_KEY is not set"))
    }

    async fn weather(&self, _at: Coordinate) -> Result<CurrentWeather> {
        Err(anyhow!("OPENWEATHER_API_KEY is not set"))
    }
}

// ---------------------------------------------------------------------------
// TextModel
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextModel: Send + Sync {
    /// Free-text completion for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl TextModel for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(self.prompt(prompt).send().await?)
    }
}
