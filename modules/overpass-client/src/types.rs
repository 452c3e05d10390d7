use envimap_common::{Coordinate, FeatureKind, RawFeature, Tags};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One element of an `[out:json]` response. Nodes carry `lat`/`lon`;
/// ways and relations carry `center` when queried with `out center`.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: Tags,
}

impl Element {
    fn feature_kind(&self) -> Option<FeatureKind> {
        match self.kind.as_str() {
            "node" => Some(FeatureKind::Node),
            "way" => Some(FeatureKind::Way),
            "relation" => Some(FeatureKind::Relation),
            _ => None,
        }
    }

    fn coordinate(&self, kind: FeatureKind) -> Option<Coordinate> {
        match kind {
            FeatureKind::Node => Some(Coordinate::new(self.lat?, self.lon?)),
            FeatureKind::Way | FeatureKind::Relation => {
                self.center.map(|c| Coordinate::new(c.lat, c.lon))
            }
        }
    }

    /// Convert to a core feature; `None` for element types other than node/way/relation.
    pub fn into_feature(self) -> Option<RawFeature> {
        let kind = self.feature_kind()?;
        Some(RawFeature {
            kind,
            id: self.id,
            coordinate: self.coordinate(kind),
            tags: self.tags,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Set when the server hit a runtime error or timeout mid-query.
    #[serde(default)]
    pub remark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn elements(value: serde_json::Value) -> Vec<RawFeature> {
        let response: OverpassResponse = serde_json::from_value(value).unwrap();
        response
            .elements
            .into_iter()
            .filter_map(Element::into_feature)
            .collect()
    }

    #[test]
    fn nodes_use_their_own_position() {
        let features = elements(json!({"elements": [
            {"type": "node", "id": 1, "lat": 10.0, "lon": 20.0, "tags": {"amenity": "fuel"}}
        ]}));
        assert_eq!(features[0].kind, FeatureKind::Node);
        assert_eq!(features[0].coordinate, Some(Coordinate::new(10.0, 20.0)));
        assert_eq!(features[0].tags.get("amenity").map(String::as_str), Some("fuel"));
    }

    #[test]
    fn ways_and_relations_use_center() {
        let features = elements(json!({"elements": [
            {"type": "way", "id": 2, "center": {"lat": 1.5, "lon": 2.5}, "tags": {"landuse": "landfill"}},
            {"type": "relation", "id": 3, "center": {"lat": 3.5, "lon": 4.5}}
        ]}));
        assert_eq!(features[0].coordinate, Some(Coordinate::new(1.5, 2.5)));
        assert_eq!(features[1].kind, FeatureKind::Relation);
        assert!(features[1].tags.is_empty());
    }

    #[test]
    fn missing_positions_yield_no_coordinate() {
        let features = elements(json!({"elements": [
            {"type": "way", "id": 4, "tags": {"power": "plant"}},
            {"type": "node", "id": 5, "lat": 1.0}
        ]}));
        assert_eq!(features.len(), 2);
        assert!(features.iter().all(|f| f.coordinate.is_none()));
    }

    #[test]
    fn unknown_element_types_are_skipped() {
        let features = elements(json!({"elements": [
            {"type": "area", "id": 6},
            {"type": "node", "id": 7, "lat": 0.0, "lon": 0.0}
        ]}));
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].coordinate, Some(Coordinate::new(0.0, 0.0)));
    }
}
