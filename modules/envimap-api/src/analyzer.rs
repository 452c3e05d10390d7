//! The request orchestrator: place → features → map + narrative + health card.
//!
//! Stages, in order:
//!
//! 1. Resolve the place names (reverse geocoding when coordinates are given).
//! 2. Forward-geocode `"<area>, <city>"` to a center point and bounding box.
//! 3. Query emission-source features around the center and bucket them.
//! 4. Ask the model for per-point pollutants. Any failure here falls back to
//!    the lexicon.
//! 5. Render the boundary, points and pie chart.
//! 6. Ask the model for the area narrative. Failure aborts with 502.
//! 7. Fetch air quality and weather concurrently. Failures degrade to
//!    placeholder readings.
//! 8. Ask the model for the health card. Failure aborts with 502.

use std::sync::Arc;

use ai_client::util::{json_array_span, truncate_to_char_boundary};
use envimap_common::{
    bucket_features, render_area, Annotations, Boundary, BoundingBox, CategoryBuckets,
    Coordinate, EnviMapError, FeatureCollection, PieSlice, RenderedArea, ANNOTATION_BATCH_LIMIT,
};
use nominatim_client::{GeocodedPlace, PlaceName};
use openweather_client::{AirQuality, Weather};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::AnalyzeError;
use crate::health::{parse_recommendations, HealthCard};
use crate::narrative::Narrative;
use crate::prompts;
use crate::traits::{EnvironmentReadings, FeatureSource, Geocoder, TextModel};

/// Longest slice of an unusable model response kept in logs.
const LOG_PREVIEW_BYTES: usize = 200;

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl AnalyzeRequest {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn named(area: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            city: Some(city.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geocode {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl From<&GeocodedPlace> for Geocode {
    fn from(place: &GeocodedPlace) -> Self {
        Self {
            lat: place.coordinate.lat,
            lon: place.coordinate.lon,
            display_name: place.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaLocation {
    pub city: String,
    pub area: String,
}

/// An air-quality reading tagged with the place it was taken for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedAirQuality {
    #[serde(flatten)]
    pub reading: AirQuality,
    pub location: AreaLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub summary: String,
    pub pie_chart_data: Vec<PieSlice>,
    pub ai_rating: Value,
    pub geocode: Geocode,
    pub bbox: BoundingBox,
    pub geojson: FeatureCollection,
    pub pois: CategoryBuckets,
    pub air_quality: LocatedAirQuality,
    pub weather: Weather,
    pub health_card: HealthCard,
    pub environmental_impact: Narrative,
}

// ---------------------------------------------------------------------------
// AreaAnalyzer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AreaAnalyzer {
    geocoder: Arc<dyn Geocoder>,
    features: Arc<dyn FeatureSource>,
    readings: Arc<dyn EnvironmentReadings>,
    model: Arc<dyn TextModel>,
}

impl AreaAnalyzer {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        features: Arc<dyn FeatureSource>,
        readings: Arc<dyn EnvironmentReadings>,
        model: Arc<dyn TextModel>,
    ) -> Self {
        Self {
            geocoder,
            features,
            readings,
            model,
        }
    }

    /// Run one full analysis inside its own `analyze_area` span.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        let request_id = Uuid::new_v4();
        self.run(request)
            .instrument(info_span!("analyze_area", %request_id))
            .await
    }

    async fn run(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        let place = self.resolve_place(&request).await?;
        info!(area = %place.area, city = %place.city, "Starting analysis");

        let located = self.locate(&place).await?;

        let features = self
            .features
            .features_around(located.coordinate)
            .await
            .map_err(|e| AnalyzeError::Lookup(format!("Feature query failed: {e}")))?;
        let buckets = bucket_features(&features);
        info!(
            features = features.len(),
            pois = buckets.total(),
            categories = buckets.categories().len(),
            "Collected emission sources"
        );

        let annotations = self.annotate(&place, &buckets).await;
        let boundary = Boundary::new(&place.area, &place.city, located.bbox);
        let RenderedArea {
            geojson, pie_chart, ..
        } = render_area(&buckets, &annotations, &boundary);

        let narrative = self.narrate(&place, &buckets).await?;

        let (air_quality, weather) = tokio::join!(
            self.air_quality(located.coordinate),
            self.weather(located.coordinate)
        );

        let health_card = self
            .health_card(&place, air_quality.clone(), weather.clone())
            .await?;

        info!(
            pois = buckets.total(),
            aqi = air_quality.aqi,
            rating = %narrative.ai_rating,
            "Analysis complete"
        );

        Ok(AnalyzeResponse {
            summary: narrative.summary.clone(),
            pie_chart_data: pie_chart,
            ai_rating: narrative.ai_rating.clone(),
            geocode: Geocode::from(&located),
            bbox: located.bbox,
            geojson,
            pois: buckets,
            air_quality: LocatedAirQuality {
                reading: air_quality,
                location: AreaLocation {
                    city: place.city,
                    area: place.area,
                },
            },
            weather,
            health_card,
            environmental_impact: narrative,
        })
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    async fn resolve_place(&self, request: &AnalyzeRequest) -> Result<PlaceName, AnalyzeError> {
        if let (Some(lat), Some(lon)) = (request.latitude, request.longitude) {
            let coordinate = Coordinate::checked(lat, lon)
                .map_err(|e| AnalyzeError::BadRequest(e.to_string()))?;
            return Ok(match self.geocoder.reverse(coordinate).await {
                Ok(name) => name,
                Err(e) => {
                    warn!(error = %e, lat, lon, "Reverse geocoding failed, using placeholder names");
                    PlaceName::unknown()
                }
            });
        }

        let named = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (named(&request.area), named(&request.city)) {
            (Some(area), Some(city)) => Ok(PlaceName::new(area, city)),
            _ => Err(AnalyzeError::BadRequest(
                "Provide latitude and longitude, or both city and area".to_string(),
            )),
        }
    }

    async fn locate(&self, place: &PlaceName) -> Result<GeocodedPlace, AnalyzeError> {
        let query = format!("{}, {}", place.area, place.city);
        self.geocoder
            .search(&query)
            .await
            .map_err(|e| AnalyzeError::Lookup(format!("Geocoding failed: {e}")))?
            .ok_or_else(|| AnalyzeError::Lookup("Could not geocode area/city".to_string()))
    }

    /// Model annotations for the first batch of points; empty on any failure.
    async fn annotate(&self, place: &PlaceName, buckets: &CategoryBuckets) -> Annotations {
        if buckets.is_empty() {
            return Annotations::new();
        }

        let requests = buckets.annotation_requests();
        let prompt = prompts::annotation_prompt(place, &requests);
        let response = match self.model.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Annotation request failed, using lexicon pollutants");
                return Annotations::new();
            }
        };

        match parse_annotations(&response) {
            Ok(annotations) => {
                info!(
                    requested = requests.len().min(ANNOTATION_BATCH_LIMIT),
                    annotated = annotations.len(),
                    "Applied model annotations"
                );
                annotations
            }
            Err(reason) => {
                warn!(
                    reason = %reason,
                    response = truncate_to_char_boundary(&response, LOG_PREVIEW_BYTES),
                    "Unusable annotation response, using lexicon pollutants"
                );
                Annotations::new()
            }
        }
    }

    async fn narrate(
        &self,
        place: &PlaceName,
        buckets: &CategoryBuckets,
    ) -> Result<Narrative, AnalyzeError> {
        let prompt = prompts::narrative_prompt(place, buckets);
        let response = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| AnalyzeError::Upstream(e.to_string()))?;
        Narrative::from_response(&response)
    }

    async fn air_quality(&self, at: Coordinate) -> AirQuality {
        match self.readings.air_quality(at).await {
            Ok(Some(reading)) => reading,
            Ok(None) => {
                warn!("No air quality data available");
                AirQuality::unavailable("No air quality data available")
            }
            Err(e) => {
                warn!(error = %e, "Air quality lookup failed");
                AirQuality::unavailable(format!("Failed to fetch air quality data: {e}"))
            }
        }
    }

    async fn weather(&self, at: Coordinate) -> Weather {
        match self.readings.weather(at).await {
            Ok(current) => Weather::Current(current),
            Err(e) => {
                warn!(error = %e, "Weather lookup failed");
                Weather::unavailable(format!("Failed to fetch weather data: {e}"))
            }
        }
    }

    async fn health_card(
        &self,
        place: &PlaceName,
        air_quality: AirQuality,
        weather: Weather,
    ) -> Result<HealthCard, AnalyzeError> {
        let prompt = prompts::health_prompt(&place.display_name, &air_quality, &weather);
        let response = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| AnalyzeError::Upstream(e.to_string()))?;
        let recommendations = parse_recommendations(&response)?;
        Ok(HealthCard::new(
            place.display_name.clone(),
            air_quality,
            weather,
            recommendations,
        ))
    }
}

/// Read the outermost `[...]` span of an annotation response.
fn parse_annotations(text: &str) -> Result<Annotations, EnviMapError> {
    let span = json_array_span(text)
        .ok_or_else(|| EnviMapError::Parse("no JSON array in response".to_string()))?;
    Annotations::from_json(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotations_are_read_from_fenced_arrays() {
        let annotations = parse_annotations(
            "```json\n[{\"lat\": 1.0, \"lon\": 2.0, \"pollutants\": [\"NOx\"]}]\n```",
        )
        .unwrap();
        assert_eq!(annotations.len(), 1);
    }

    #[test]
    fn annotation_parse_failures_are_reported() {
        assert!(parse_annotations("none").is_err());
        assert!(parse_annotations("[not json]").is_err());
    }

    #[test]
    fn request_constructors() {
        let request = AnalyzeRequest::at(1.0, 2.0);
        assert_eq!(request.latitude, Some(1.0));
        assert_eq!(request.city, None);

        let request = AnalyzeRequest::named("Soho", "London");
        assert_eq!(request.area.as_deref(), Some("Soho"));
        assert_eq!(request.latitude, None);
    }

    #[test]
    fn request_accepts_partial_bodies() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"city": "London"}"#).unwrap();
        assert_eq!(request.city.as_deref(), Some("London"));
        assert_eq!(request.area, None);
    }
}
