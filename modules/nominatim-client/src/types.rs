use envimap_common::{BoundingBox, Coordinate};
use serde::Deserialize;

use crate::error::{NominatimError, Result};

/// Half-width of the square used when a search hit carries no bounding box.
pub const FALLBACK_RADIUS_DEG: f64 = 0.009;

// ---------------------------------------------------------------------------
// Forward search
// ---------------------------------------------------------------------------

/// One `/search` result. Nominatim returns numbers as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    /// `[minLat, maxLat, minLon, maxLon]`
    #[serde(default)]
    pub boundingbox: Option<Vec<String>>,
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| NominatimError::Parse(format!("{field} is not a number: '{raw}'")))
}

impl SearchHit {
    pub fn coordinate(&self) -> Result<Coordinate> {
        Ok(Coordinate::new(
            parse_degrees("lat", &self.lat)?,
            parse_degrees("lon", &self.lon)?,
        ))
    }

    /// The hit's extent reordered to `[minLon, minLat, maxLon, maxLat]`.
    pub fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        let Some(raw) = &self.boundingbox else {
            return Ok(None);
        };
        let [min_lat, max_lat, min_lon, max_lon] = raw.as_slice() else {
            return Err(NominatimError::Parse(format!(
                "boundingbox has {} entries, expected 4",
                raw.len()
            )));
        };
        Ok(Some(BoundingBox::new(
            parse_degrees("boundingbox", min_lon)?,
            parse_degrees("boundingbox", min_lat)?,
            parse_degrees("boundingbox", max_lon)?,
            parse_degrees("boundingbox", max_lat)?,
        )))
    }

    pub fn into_place(self) -> Result<GeocodedPlace> {
        let coordinate = self.coordinate()?;
        let bbox = self
            .bounding_box()?
            .unwrap_or_else(|| BoundingBox::around(coordinate, FALLBACK_RADIUS_DEG));
        Ok(GeocodedPlace {
            coordinate,
            bbox,
            display_name: self.display_name,
        })
    }
}

/// A forward-geocoded place: center point plus extent.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub bbox: BoundingBox,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Reverse lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
}

/// A `/reverse` response. Misses come back as `200 {"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResult {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: ReverseAddress,
    #[serde(default)]
    pub error: Option<String>,
}

fn first_present(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

impl ReverseResult {
    pub fn place_name(&self) -> PlaceName {
        let a = &self.address;
        let city = first_present(&[&a.city, &a.town, &a.village, &a.county]).unwrap_or_default();
        let area = first_present(&[&a.suburb, &a.neighbourhood, &a.district, &a.state])
            .unwrap_or_else(|| {
                self.display_name
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            });
        PlaceName {
            city,
            area,
            display_name: self.display_name.clone(),
        }
    }
}

/// Human-readable names for a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName {
    pub city: String,
    pub area: String,
    pub display_name: String,
}

impl PlaceName {
    pub fn unknown() -> Self {
        Self {
            city: "Unknown City".to_string(),
            area: "Unknown Area".to_string(),
            display_name: "Unknown Location".to_string(),
        }
    }

    pub fn new(area: impl Into<String>, city: impl Into<String>) -> Self {
        let area = area.into();
        let city = city.into();
        Self {
            display_name: format!("{area}, {city}"),
            city,
            area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(value: serde_json::Value) -> SearchHit {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn bounding_box_is_reordered_to_lon_lat() {
        let place = hit(json!({
            "lat": "51.5136", "lon": "-0.1365",
            "display_name": "Soho, London",
            "boundingbox": ["51.50", "51.52", "-0.14", "-0.12"]
        }))
        .into_place()
        .unwrap();
        assert_eq!(place.coordinate, Coordinate::new(51.5136, -0.1365));
        assert_eq!(place.bbox.as_array(), [-0.14, 51.50, -0.12, 51.52]);
    }

    #[test]
    fn missing_bounding_box_falls_back_to_square() {
        let place = hit(json!({"lat": "10.0", "lon": "20.0"})).into_place().unwrap();
        let [min_lon, min_lat, max_lon, max_lat] = place.bbox.as_array();
        assert!((min_lon - 19.991).abs() < 1e-9);
        assert!((min_lat - 9.991).abs() < 1e-9);
        assert!((max_lon - 20.009).abs() < 1e-9);
        assert!((max_lat - 10.009).abs() < 1e-9);
    }

    #[test]
    fn malformed_numbers_are_parse_errors() {
        let err = hit(json!({"lat": "north", "lon": "1"})).into_place().unwrap_err();
        assert!(matches!(err, NominatimError::Parse(_)));
        let err = hit(json!({"lat": "1", "lon": "1", "boundingbox": ["1", "2"]}))
            .into_place()
            .unwrap_err();
        assert!(matches!(err, NominatimError::Parse(_)));
    }

    #[test]
    fn place_name_prefers_city_then_town() {
        let result: ReverseResult = serde_json::from_value(json!({
            "display_name": "Shoreditch, London, England",
            "address": {"town": "Hackney", "county": "Greater London", "suburb": "Shoreditch"}
        }))
        .unwrap();
        let name = result.place_name();
        assert_eq!(name.city, "Hackney");
        assert_eq!(name.area, "Shoreditch");
        assert_eq!(name.display_name, "Shoreditch, London, England");
    }

    #[test]
    fn area_falls_back_to_first_display_segment() {
        let result: ReverseResult = serde_json::from_value(json!({
            "display_name": "Camden Town, London, England",
            "address": {"city": "London", "suburb": ""}
        }))
        .unwrap();
        let name = result.place_name();
        assert_eq!(name.city, "London");
        assert_eq!(name.area, "Camden Town");
    }

    #[test]
    fn unknown_place_name() {
        let name = PlaceName::unknown();
        assert_eq!(name.city, "Unknown City");
        assert_eq!(name.area, "Unknown Area");
        assert_eq!(name.display_name, "Unknown Location");
    }
}
