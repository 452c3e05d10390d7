use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EnviMapError;

/// Raw OSM key/value tags of a feature.
pub type Tags = BTreeMap<String, String>;

// =============================================================================
// Geography
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// A coordinate whose latitude and longitude are within WGS84 range.
    pub fn checked(lat: f64, lon: f64) -> Result<Self, EnviMapError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(EnviMapError::Validation(format!(
                "coordinates out of range: latitude {lat}, longitude {lon}"
            )));
        }
        Ok(Self::new(lat, lon))
    }

    /// Exact-match lookup key, `"<lat>,<lon>"`.
    ///
    /// Uses the shortest round-trip rendering of each float, so two equal
    /// coordinates always produce the same key regardless of where they came from.
    pub fn key(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    /// GeoJSON position order.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Rectangular extent of the queried area.
///
/// Serializes as `[minLon, minLat, maxLon, maxLat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Square box of `radius_deg` degrees on each side of `center`.
    pub fn around(center: Coordinate, radius_deg: f64) -> Self {
        Self::new(
            center.lon - radius_deg,
            center.lat - radius_deg,
            center.lon + radius_deg,
            center.lat + radius_deg,
        )
    }

    /// Closed ring SW → NW → NE → SE → SW, in `[lon, lat]` order.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        vec![
            [self.min_lon, self.min_lat],
            [self.min_lon, self.max_lat],
            [self.max_lon, self.max_lat],
            [self.max_lon, self.min_lat],
            [self.min_lon, self.min_lat],
        ]
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [min_lon, min_lat, max_lon, max_lat] = <[f64; 4]>::deserialize(deserializer)?;
        Ok(Self::new(min_lon, min_lat, max_lon, max_lat))
    }
}

// =============================================================================
// Raw features
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Node,
    Way,
    Relation,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Node => write!(f, "node"),
            FeatureKind::Way => write!(f, "way"),
            FeatureKind::Relation => write!(f, "relation"),
        }
    }
}

/// A tagged geographic element as returned by the feature query.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub kind: FeatureKind,
    pub id: i64,
    pub coordinate: Option<Coordinate>,
    pub tags: Tags,
}

impl RawFeature {
    pub fn node(id: i64, lat: f64, lon: f64, tags: Tags) -> Self {
        Self {
            kind: FeatureKind::Node,
            id,
            coordinate: Some(Coordinate::new(lat, lon)),
            tags,
        }
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Fine-grained emission-source label such as `industrial_oil` or `waste_landfill`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `industrial_oil` → `Industrial Oil`.
    ///
    /// Underscores become spaces; a letter is uppercased when it follows a
    /// non-letter and lowercased otherwise.
    pub fn title(&self) -> String {
        let mut title = String::with_capacity(self.0.len());
        let mut after_letter = false;
        for c in self.0.chars() {
            if c == '_' {
                title.push(' ');
                after_letter = false;
            } else if c.is_alphabetic() {
                if after_letter {
                    title.extend(c.to_lowercase());
                } else {
                    title.extend(c.to_uppercase());
                }
                after_letter = true;
            } else {
                title.push(c);
                after_letter = false;
            }
        }
        title
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// POI records
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiAddress {
    pub street: Option<String>,
    pub housenumber: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
}

impl PoiAddress {
    pub fn from_tags(tags: &Tags) -> Self {
        Self {
            street: tags.get("addr:street").cloned(),
            housenumber: tags.get("addr:housenumber").cloned(),
            city: tags.get("addr:city").cloned(),
            postcode: tags.get("addr:postcode").cloned(),
        }
    }
}

/// A classified point of interest, owned by its category bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(rename = "id")]
    pub source_id: i64,
    #[serde(rename = "name")]
    pub raw_name: String,
    pub display_name: String,
    pub address: PoiAddress,
    pub operator: String,
    pub description: String,
    #[serde(rename = "tags")]
    pub raw_tags: Tags,
}

impl PoiRecord {
    /// Build a record for a feature already known to carry `coordinate`.
    pub fn from_feature(feature: &RawFeature, coordinate: Coordinate, category: &Category) -> Self {
        let tag = |key: &str| feature.tags.get(key).cloned().unwrap_or_default();
        let raw_name = tag("name");
        let display_name = if raw_name.is_empty() {
            category.title()
        } else {
            raw_name.clone()
        };

        Self {
            coordinate,
            kind: feature.kind,
            source_id: feature.id,
            raw_name,
            display_name,
            address: PoiAddress::from_tags(&feature.tags),
            operator: tag("operator"),
            description: tag("description"),
            raw_tags: feature.tags.clone(),
        }
    }
}

// =============================================================================
// Category buckets
// =============================================================================

/// Category → POIs, in discovery order for both categories and records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBuckets {
    order: Vec<Category>,
    buckets: HashMap<Category, Vec<PoiRecord>>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, record: PoiRecord) {
        match self.buckets.get_mut(&category) {
            Some(records) => records.push(record),
            None => {
                self.order.push(category.clone());
                self.buckets.insert(category, vec![record]);
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<&[PoiRecord]> {
        self.buckets
            .get(&Category::new(category))
            .map(Vec::as_slice)
    }

    pub fn categories(&self) -> &[Category] {
        &self.order
    }

    /// Buckets in the order their categories were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[PoiRecord])> {
        self.order.iter().filter_map(|category| {
            self.buckets
                .get(category)
                .map(|records| (category, records.as_slice()))
        })
    }

    /// Every record paired with its category, bucket by bucket.
    pub fn records(&self) -> impl Iterator<Item = (&Category, &PoiRecord)> {
        self.iter()
            .flat_map(|(category, records)| records.iter().map(move |record| (category, record)))
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for CategoryBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (category, records) in self.iter() {
            map.serialize_entry(category, records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_key_is_shortest_round_trip() {
        assert_eq!(Coordinate::new(10.0, 20.0).key(), "10,20");
        assert_eq!(Coordinate::new(40.7128, -74.006).key(), "40.7128,-74.006");
    }

    #[test]
    fn checked_coordinates_reject_out_of_range_values() {
        assert!(Coordinate::checked(0.0, 0.0).is_ok());
        assert!(Coordinate::checked(-90.0, 180.0).is_ok());
        assert!(matches!(
            Coordinate::checked(90.5, 0.0),
            Err(EnviMapError::Validation(_))
        ));
        assert!(Coordinate::checked(0.0, -181.0).is_err());
    }

    #[test]
    fn category_title_cases_each_word() {
        assert_eq!(Category::new("industrial_oil").title(), "Industrial Oil");
        assert_eq!(
            Category::new("transport_railway_yard").title(),
            "Transport Railway Yard"
        );
    }

    #[test]
    fn category_title_capitalizes_after_any_non_letter() {
        assert_eq!(Category::new("industrial_oil;gas").title(), "Industrial Oil;Gas");
        assert_eq!(Category::new("industrial_3d-PRINT").title(), "Industrial 3D-Print");
        assert_eq!(Category::new("power__plant").title(), "Power  Plant");
    }

    #[test]
    fn bbox_serializes_as_lon_lat_array() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            serde_json::to_value(bbox).unwrap(),
            serde_json::json!([1.0, 2.0, 3.0, 4.0])
        );
    }

    #[test]
    fn poi_display_name_falls_back_to_category_title() {
        let feature = RawFeature::node(7, 1.0, 2.0, Tags::new());
        let category = Category::new("waste_landfill");
        let record = PoiRecord::from_feature(&feature, Coordinate::new(1.0, 2.0), &category);
        assert_eq!(record.display_name, "Waste Landfill");
        assert_eq!(record.raw_name, "");
    }

    #[test]
    fn poi_record_serializes_flat_shape() {
        let mut tags = Tags::new();
        tags.insert("name".into(), "Acme Refinery".into());
        tags.insert("addr:city".into(), "Springfield".into());
        let feature = RawFeature::node(42, 1.5, 2.5, tags);
        let record =
            PoiRecord::from_feature(&feature, Coordinate::new(1.5, 2.5), &Category::new("industrial_refinery"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["lat"], 1.5);
        assert_eq!(value["lon"], 2.5);
        assert_eq!(value["type"], "node");
        assert_eq!(value["id"], 42);
        assert_eq!(value["name"], "Acme Refinery");
        assert_eq!(value["display_name"], "Acme Refinery");
        assert_eq!(value["address"]["city"], "Springfield");
        assert_eq!(value["tags"]["name"], "Acme Refinery");
    }

    #[test]
    fn buckets_keep_first_seen_category_order() {
        let feature = RawFeature::node(1, 0.0, 0.0, Tags::new());
        let coord = Coordinate::new(0.0, 0.0);
        let mut buckets = CategoryBuckets::new();
        for name in ["waste_landfill", "industrial_oil", "waste_landfill"] {
            let category = Category::new(name);
            let record = PoiRecord::from_feature(&feature, coord, &category);
            buckets.push(category, record);
        }

        let order: Vec<&str> = buckets.categories().iter().map(Category::as_str).collect();
        assert_eq!(order, vec!["waste_landfill", "industrial_oil"]);
        assert_eq!(buckets.get("waste_landfill").unwrap().len(), 2);
        assert_eq!(buckets.total(), 3);
    }
}
