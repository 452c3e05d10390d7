// Test mocks for the area analyzer.
//
// Four mocks matching the four trait boundaries:
// - MockGeocoder (Geocoder): query→place and coordinate→name maps
// - MockFeatureSource (FeatureSource): fixed feature list or failure
// - MockReadings (EnvironmentReadings): fixed readings or failures
// - MockModel (TextModel): prompt-substring→response, records prompts
//
// Plus fixtures for a small industrial neighborhood.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use envimap_common::{BoundingBox, Coordinate, RawFeature, Tags};
use nominatim_client::{GeocodedPlace, PlaceName};
use openweather_client::{AirQuality, CurrentWeather};

use crate::analyzer::AreaAnalyzer;
use crate::traits::{EnvironmentReadings, FeatureSource, Geocoder, TextModel};

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

/// Center of the fixture neighborhood.
pub const MIDTOWN: (f64, f64) = (10.0, 20.0);

/// Substrings that identify each of the analyzer's prompts.
pub const ANNOTATION_PROMPT: &str = "Return a JSON array";
pub const NARRATIVE_PROMPT: &str = "environmental health expert";
pub const HEALTH_PROMPT: &str = "Generate health recommendations";

// ---------------------------------------------------------------------------
// MockGeocoder
// ---------------------------------------------------------------------------

/// Map-based geocoder. Unregistered searches find nothing; unregistered
/// reverse lookups fail.
pub struct MockGeocoder {
    places: HashMap<String, GeocodedPlace>,
    names: HashMap<String, PlaceName>,
    search_error: Option<String>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            places: HashMap::new(),
            names: HashMap::new(),
            search_error: None,
        }
    }

    pub fn on_search(mut self, query: &str, place: GeocodedPlace) -> Self {
        self.places.insert(query.to_string(), place);
        self
    }

    pub fn on_reverse(mut self, coordinate: Coordinate, name: PlaceName) -> Self {
        self.names.insert(coordinate.key(), name);
        self
    }

    pub fn failing_search(mut self, message: &str) -> Self {
        self.search_error = Some(message.to_string());
        self
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>> {
        if let Some(message) = &self.search_error {
            return Err(anyhow!("{message}"));
        }
        Ok(self.places.get(query).cloned())
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceName> {
        self.names.get(&coordinate.key()).cloned().ok_or_else(|| {
            anyhow!("MockGeocoder: no reverse lookup registered for {}", coordinate.key())
        })
    }
}

// ---------------------------------------------------------------------------
// MockFeatureSource
// ---------------------------------------------------------------------------

pub struct MockFeatureSource {
    result: std::result::Result<Vec<RawFeature>, String>,
}

impl MockFeatureSource {
    pub fn new(features: Vec<RawFeature>) -> Self {
        Self {
            result: Ok(features),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl FeatureSource for MockFeatureSource {
    async fn features_around(&self, _center: Coordinate) -> Result<Vec<RawFeature>> {
        self.result.clone().map_err(|message| anyhow!("{message}"))
    }
}

// ---------------------------------------------------------------------------
// MockReadings
// ---------------------------------------------------------------------------

/// Fixed readings. Both fail until configured.
pub struct MockReadings {
    air_quality: std::result::Result<Option<AirQuality>, String>,
    weather: std::result::Result<CurrentWeather, String>,
}

impl MockReadings {
    pub fn new() -> Self {
        Self {
            air_quality: Err("MockReadings: no air quality registered".to_string()),
            weather: Err("MockReadings: no weather registered".to_string()),
        }
    }

    pub fn with_air_quality(mut self, reading: AirQuality) -> Self {
        self.air_quality = Ok(Some(reading));
        self
    }

    pub fn without_air_data(mut self) -> Self {
        self.air_quality = Ok(None);
        self
    }

    pub fn with_weather(mut self, weather: CurrentWeather) -> Self {
        self.weather = Ok(weather);
        self
    }
}

impl Default for MockReadings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentReadings for MockReadings {
    async fn air_quality(&self, _at: Coordinate) -> Result<Option<AirQuality>> {
        self.air_quality.clone().map_err(|message| anyhow!("{message}"))
    }

    async fn weather(&self, _at: Coordinate) -> Result<CurrentWeather> {
        self.weather.clone().map_err(|message| anyhow!("{message}"))
    }
}

// ---------------------------------------------------------------------------
// MockModel
// ---------------------------------------------------------------------------

/// Answers each prompt with the first registered response whose needle the
/// prompt contains. Unmatched prompts fail. Every prompt is recorded.
pub struct MockModel {
    responses: Vec<(String, std::result::Result<String, String>)>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn on_prompt(mut self, needle: &str, response: &str) -> Self {
        self.responses
            .push((needle.to_string(), Ok(response.to_string())));
        self
    }

    pub fn failing_on(mut self, needle: &str, message: &str) -> Self {
        self.responses
            .push((needle.to_string(), Err(message.to_string())));
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts()
            .into_iter()
            .filter(|prompt| prompt.contains(needle))
            .collect()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let (_, response) = self
            .responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .ok_or_else(|| anyhow!("MockModel: no response registered for prompt"))?;
        response.clone().map_err(|message| anyhow!("{message}"))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The geocoded fixture neighborhood, with a bounding box.
pub fn midtown_place() -> GeocodedPlace {
    let (lat, lon) = MIDTOWN;
    GeocodedPlace {
        coordinate: Coordinate::new(lat, lon),
        bbox: BoundingBox::new(19.95, 9.95, 20.05, 10.05),
        display_name: "Midtown, Springfield, USA".to_string(),
    }
}

/// Two refineries, a fuel station, a landfill and a bakery.
pub fn midtown_features() -> Vec<RawFeature> {
    vec![
        RawFeature::node(1, 10.0, 20.0, tags(&[("industrial", "oil"), ("name", "North Refinery")])),
        RawFeature::node(2, 10.01, 20.01, tags(&[("amenity", "fuel")])),
        RawFeature::node(3, 10.02, 20.02, tags(&[("landuse", "landfill")])),
        RawFeature::node(4, 10.03, 20.03, tags(&[("shop", "bakery")])),
        RawFeature::node(5, 10.04, 20.04, tags(&[("industrial", "oil"), ("name", "South Refinery")])),
    ]
}

pub fn sample_air_quality() -> AirQuality {
    AirQuality {
        aqi: 3,
        components: [("pm2_5".to_string(), 44.0), ("no2".to_string(), 18.2)].into(),
        dt: "2024-05-01T12:00:00".to_string(),
        error: None,
    }
}

pub fn sample_weather() -> CurrentWeather {
    CurrentWeather {
        temp: 21.5,
        feels_like: 20.9,
        humidity: 40.0,
        wind_speed: 3.6,
        description: "clear sky".to_string(),
        icon: "01d".to_string(),
        city: "Springfield".to_string(),
        dt: "2024-05-01T12:00:00".to_string(),
        pressure: 1015.0,
        visibility: 10000.0,
    }
}

pub const NARRATIVE_RESPONSE: &str = r#"Here is the assessment:
{
  "category": "Poor",
  "summary": "Two refineries dominate the area's emissions.",
  "ai_rating": 38,
  "key_factors": ["Refineries", "Fuel station traffic", "Landfill"],
  "risks": [{"level": "High", "description": "SO2 from refining"}],
  "Key_Insights": [
    {"description": "Refinery plumes drive PM2.5", "impact": "High"},
    "Landfill odor episodes"
  ]
}"#;

pub const HEALTH_RESPONSE: &str = r#"{"conditions": {"Asthma": {"risk_level": "High", "do": ["Carry an inhaler"], "dont": ["Jog outdoors"]}}}"#;

pub const ANNOTATION_RESPONSE: &str = r#"```json
[{"lat": 10.0, "lon": 20.0, "pollutants": ["Benzene", "SO2", "Benzene"]}]
```"#;

/// A model that answers all three prompts sensibly.
pub fn happy_model() -> MockModel {
    MockModel::new()
        .on_prompt(ANNOTATION_PROMPT, ANNOTATION_RESPONSE)
        .on_prompt(NARRATIVE_PROMPT, NARRATIVE_RESPONSE)
        .on_prompt(HEALTH_PROMPT, HEALTH_RESPONSE)
}

/// An analyzer over the fixture neighborhood, with the given model and readings.
pub fn midtown_analyzer(model: Arc<MockModel>, readings: MockReadings) -> AreaAnalyzer {
    AreaAnalyzer::new(
        Arc::new(MockGeocoder::new().on_search("Midtown, Springfield", midtown_place())),
        Arc::new(MockFeatureSource::new(midtown_features())),
        Arc::new(readings),
        model,
    )
}
