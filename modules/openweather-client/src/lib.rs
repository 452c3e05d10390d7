pub mod error;
pub mod types;

pub use error::{OpenWeatherError, Result};
pub use types::{AirQuality, CurrentWeather, Weather};

use envimap_common::Coordinate;
use serde::de::DeserializeOwned;
use types::{AirPollutionResponse, WeatherResponse};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        coordinate: Coordinate,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lon.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .query(extra)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenWeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Current air pollution reading.
    pub async fn air_quality(&self, coordinate: Coordinate) -> Result<AirQuality> {
        let response: AirPollutionResponse =
            self.get_json("air_pollution", coordinate, &[]).await?;
        let aq = response.into_air_quality()?;
        tracing::debug!(aqi = aq.aqi, pm2_5 = aq.pm2_5(), "Fetched air quality");
        Ok(aq)
    }

    /// Current weather in metric units.
    pub async fn current_weather(&self, coordinate: Coordinate) -> Result<CurrentWeather> {
        let response: WeatherResponse = self
            .get_json("weather", coordinate, &[("units", "metric")])
            .await?;
        let current = response.into_current()?;
        tracing::debug!(temp = current.temp, city = %current.city, "Fetched weather");
        Ok(current)
    }
}
