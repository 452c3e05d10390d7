//! Prompt text for the three model calls of an analysis.

use envimap_common::{AnnotationRequest, CategoryBuckets, ANNOTATION_BATCH_LIMIT};
use nominatim_client::PlaceName;
use openweather_client::{AirQuality, Weather};
use serde::Serialize;

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Per-point pollutant annotation. Only the first [`ANNOTATION_BATCH_LIMIT`]
/// points are listed; the count in the opening line is the full total.
pub fn annotation_prompt(place: &PlaceName, requests: &[AnnotationRequest]) -> String {
    let batch = &requests[..requests.len().min(ANNOTATION_BATCH_LIMIT)];
    format!(
        r#"Analyze environmental impact for these {total} points of interest in {area}, {city}.
For each POI in this list: {batch}

Return a JSON array where each element contains:
- "lat": Original latitude
- "lon": Original longitude
- "pollutants": Array of most likely pollutants that could be emitted analysing the category (no emission levels needed)

Format example:
[
    {{
        "lat": 40.7128,
        "lon": -74.0060,
        "pollutants": ["PM2.5", "NOx", "CO2"]
    }}
]"#,
        total = requests.len(),
        area = place.area,
        city = place.city,
        batch = pretty_json(batch),
    )
}

/// Area-level narrative assessment over every categorized POI.
pub fn narrative_prompt(place: &PlaceName, pois: &CategoryBuckets) -> String {
    format!(
        r#"Imagine you are an environmental health expert.
Analyze the environmental impact for {area}, {city} and provide a structured assessment.
Based on the POIs: {pois}

Return a JSON with:
- "category": One word status (Good/Moderate/Poor/Severe/Critical)
- "summary": Concise analysis of environmental profile (4-5 sentences)
- "ai_rating": Numerical score 0-100
- "key_factors": Array of 3-4 main factors affecting the area's environmental health
- "risks": Array of potential environmental risks, each with:
    - "level": (Low/Medium/High)
    - "description": Brief description
- "Key_Insights": Array of 3-4 key insights, each with:
    - "description": Brief description of the insight, focused on the overall air quality impact of the area
    - "impact": (Low/Medium/High)

IMPORTANT: Return only the raw JSON."#,
        area = place.area,
        city = place.city,
        pois = pretty_json(pois),
    )
}

const HEALTH_CONDITIONS: [&str; 6] = [
    "Asthma",
    "Heart_Issues",
    "Allergies",
    "Sinus",
    "Cold_Flu",
    "COPD",
];

/// Per-condition health guidance from the current readings.
pub fn health_prompt(location: &str, air_quality: &AirQuality, weather: &Weather) -> String {
    let conditions = HEALTH_CONDITIONS
        .iter()
        .map(|condition| {
            format!(
                r#"        "{condition}": {{
            "risk_level": "Low/Medium/High",
            "do": ["action1", "action2,..."],
            "dont": ["action1", "action2,..."]
        }}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Generate health recommendations based on:
Location: {location}
AQI: {aqi}
PM2.5: {pm25} μg/m³
Weather: {weather}

Return a JSON object with the following structure:
{{
    "conditions": {{
{conditions}
    }}
}}

Respond only with the JSON object, no additional text."#,
        aqi = air_quality.aqi,
        pm25 = air_quality.pm2_5(),
        weather = weather.description().unwrap_or("unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use envimap_common::{bucket_features, RawFeature, Tags};

    fn place() -> PlaceName {
        PlaceName::new("Midtown", "Springfield")
    }

    fn fuel_stations(count: usize) -> CategoryBuckets {
        let features: Vec<RawFeature> = (0..count)
            .map(|i| {
                let tags: Tags = [("amenity".to_string(), "fuel".to_string())].into();
                RawFeature::node(i as i64, 10.0 + i as f64 * 0.001, 20.0, tags)
            })
            .collect();
        bucket_features(&features)
    }

    #[test]
    fn annotation_prompt_caps_the_listed_batch() {
        let requests = fuel_stations(25).annotation_requests();
        let prompt = annotation_prompt(&place(), &requests);

        assert!(prompt.starts_with("Analyze environmental impact for these 25 points of interest in Midtown, Springfield."));
        assert_eq!(prompt.matches("\"category\"").count(), ANNOTATION_BATCH_LIMIT);
        assert!(prompt.contains("\"name\": \"Unnamed POI\""));
    }

    #[test]
    fn annotation_prompt_lists_small_batches_whole() {
        let requests = fuel_stations(3).annotation_requests();
        let prompt = annotation_prompt(&place(), &requests);
        assert_eq!(prompt.matches("\"category\"").count(), 3);
    }

    #[test]
    fn narrative_prompt_embeds_the_pois() {
        let prompt = narrative_prompt(&place(), &fuel_stations(2));
        assert!(prompt.contains("environmental health expert"));
        assert!(prompt.contains("Midtown, Springfield"));
        assert!(prompt.contains("\"transport_fuel\": ["));
        assert!(prompt.contains("\"Key_Insights\""));
    }

    #[test]
    fn health_prompt_reads_pm25_and_falls_back_on_weather() {
        let mut air = AirQuality::unavailable("n/a");
        air.aqi = 4;
        air.components.insert("pm2_5".into(), 55.5);
        let prompt = health_prompt("Midtown, Springfield", &air, &Weather::unavailable("down"));

        assert!(prompt.contains("Location: Midtown, Springfield"));
        assert!(prompt.contains("AQI: 4"));
        assert!(prompt.contains("PM2.5: 55.5 μg/m³"));
        assert!(prompt.contains("Weather: unknown"));
        for condition in HEALTH_CONDITIONS {
            assert!(prompt.contains(&format!("\"{condition}\"")));
        }
    }
}
