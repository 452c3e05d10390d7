use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OpenWeatherError, Result};

/// ISO-8601 without offset, e.g. `2024-05-01T12:00:00`.
fn iso_timestamp(dt: DateTime<Utc>) -> String {
    dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn iso_from_unix(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(iso_timestamp)
        .unwrap_or_else(|| iso_timestamp(Utc::now()))
}

// ---------------------------------------------------------------------------
// Air pollution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirPollutionMain {
    pub aqi: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirPollutionEntry {
    pub main: AirPollutionMain,
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    pub dt: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

/// Current air quality at a point. `error` is set when the reading is a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: u32,
    pub components: BTreeMap<String, f64>,
    pub dt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AirQuality {
    /// Placeholder reading: AQI 0, no components, stamped now.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            aqi: 0,
            components: BTreeMap::new(),
            dt: iso_timestamp(Utc::now()),
            error: Some(error.into()),
        }
    }

    /// PM2.5 concentration in μg/m³, zero when not reported.
    pub fn pm2_5(&self) -> f64 {
        self.components.get("pm2_5").copied().unwrap_or(0.0)
    }
}

impl AirPollutionResponse {
    pub fn into_air_quality(self) -> Result<AirQuality> {
        let entry = self
            .list
            .into_iter()
            .next()
            .ok_or(OpenWeatherError::NoData)?;
        Ok(AirQuality {
            aqi: entry.main.aqi,
            components: entry.components,
            dt: iso_from_unix(entry.dt),
            error: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Current weather
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WeatherWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WeatherResponse {
    pub main: WeatherMain,
    pub wind: WeatherWind,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub name: String,
    pub dt: i64,
    #[serde(default)]
    pub visibility: Option<f64>,
}

/// Current conditions in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub city: String,
    pub dt: String,
    pub pressure: f64,
    pub visibility: f64,
}

impl WeatherResponse {
    pub fn into_current(self) -> Result<CurrentWeather> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| OpenWeatherError::Parse("weather conditions missing".to_string()))?;
        Ok(CurrentWeather {
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            description: condition.description,
            icon: condition.icon,
            city: self.name,
            dt: iso_from_unix(self.dt),
            pressure: self.main.pressure,
            visibility: self.visibility.unwrap_or(0.0),
        })
    }
}

/// Weather as reported downstream: the conditions, or why they are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weather {
    Current(CurrentWeather),
    Unavailable { error: String },
}

impl Weather {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Weather::Unavailable {
            error: error.into(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Weather::Current(current) => Some(&current.description),
            Weather::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn air_quality_takes_first_entry() {
        let response: AirPollutionResponse = serde_json::from_value(json!({
            "coord": {"lon": 20.0, "lat": 10.0},
            "list": [{
                "main": {"aqi": 3},
                "components": {"co": 230.3, "pm2_5": 44.0, "pm10": 50.1},
                "dt": 1714564800
            }]
        }))
        .unwrap();
        let aq = response.into_air_quality().unwrap();
        assert_eq!(aq.aqi, 3);
        assert_eq!(aq.pm2_5(), 44.0);
        assert_eq!(aq.dt, "2024-05-01T12:00:00");
        assert_eq!(aq.error, None);
        assert!(serde_json::to_value(&aq).unwrap().get("error").is_none());
    }

    #[test]
    fn empty_list_is_no_data() {
        let response: AirPollutionResponse = serde_json::from_value(json!({"list": []})).unwrap();
        assert!(matches!(
            response.into_air_quality(),
            Err(OpenWeatherError::NoData)
        ));
    }

    #[test]
    fn unavailable_reading_has_placeholder_shape() {
        let aq = AirQuality::unavailable("No air quality data available");
        let value = serde_json::to_value(&aq).unwrap();
        assert_eq!(value["aqi"], 0);
        assert_eq!(value["components"], json!({}));
        assert_eq!(value["error"], "No air quality data available");
        assert_eq!(aq.pm2_5(), 0.0);
    }

    #[test]
    fn weather_is_flattened() {
        let response: WeatherResponse = serde_json::from_value(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.5, "feels_like": 20.9, "humidity": 40, "pressure": 1015},
            "wind": {"speed": 3.6, "deg": 250},
            "visibility": 10000,
            "dt": 1714564800,
            "name": "Springfield"
        }))
        .unwrap();
        let current = response.into_current().unwrap();
        assert_eq!(current.description, "clear sky");
        assert_eq!(current.city, "Springfield");
        assert_eq!(current.wind_speed, 3.6);
        assert_eq!(current.visibility, 10000.0);

        let weather = Weather::Current(current);
        assert_eq!(weather.description(), Some("clear sky"));
        let value = serde_json::to_value(&weather).unwrap();
        assert_eq!(value["temp"], 21.5);
        assert_eq!(value["icon"], "01d");
    }

    #[test]
    fn unavailable_weather_serializes_as_error_only() {
        let weather = Weather::unavailable("Failed to fetch weather data: timeout");
        assert_eq!(weather.description(), None);
        assert_eq!(
            serde_json::to_value(&weather).unwrap(),
            json!({"error": "Failed to fetch weather data: timeout"})
        );
    }
}
