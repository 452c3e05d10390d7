//! Health card: pollution-equivalent cigarettes plus model recommendations.

use ai_client::util::json_object_span;
use openweather_client::{AirQuality, Weather};
use serde::Serialize;
use serde_json::Value;

use crate::error::AnalyzeError;

/// PM2.5 (μg/m³) equivalent to smoking one cigarette per day.
const PM25_PER_CIGARETTE: f64 = 22.0;

/// Daily cigarette equivalent of a PM2.5 level, rounded to one decimal.
pub fn cigarettes_per_day(pm2_5: f64) -> f64 {
    (pm2_5 / PM25_PER_CIGARETTE * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCard {
    pub location: String,
    pub cigarettes_per_day: f64,
    pub air_quality: AirQuality,
    pub weather: Weather,
    pub recommendations: Value,
}

impl HealthCard {
    pub fn new(
        location: impl Into<String>,
        air_quality: AirQuality,
        weather: Weather,
        recommendations: Value,
    ) -> Self {
        Self {
            location: location.into(),
            cigarettes_per_day: cigarettes_per_day(air_quality.pm2_5()),
            air_quality,
            weather,
            recommendations,
        }
    }
}

/// Parse the outermost `{...}` span of the recommendations response.
pub fn parse_recommendations(text: &str) -> Result<Value, AnalyzeError> {
    let span = json_object_span(text).ok_or_else(|| {
        AnalyzeError::Upstream("No valid JSON found in health recommendations".to_string())
    })?;
    serde_json::from_str(span).map_err(|e| {
        AnalyzeError::Upstream(format!("Invalid health recommendations JSON: {e}"))
    })
}
