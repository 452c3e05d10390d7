//! GeoJSON output: one boundary polygon plus one point per classified POI.

use serde::Serialize;

use crate::types::{BoundingBox, Coordinate, PoiAddress, Tags};

const BOUNDARY_COLOR: &str = "#0070f3";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryProperties {
    pub name: String,
    #[serde(rename = "strokeColor")]
    pub stroke_color: &'static str,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: u32,
    #[serde(rename = "fillColor")]
    pub fill_color: &'static str,
    #[serde(rename = "fillOpacity")]
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiProperties {
    pub category: String,
    pub super_category: String,
    pub super_category_name: String,
    pub name: String,
    pub display_name: String,
    pub color: String,
    pub pollutants: Vec<String>,
    pub primary_concerns: Vec<String>,
    pub address: PoiAddress,
    pub operator: String,
    pub description: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeatureProperties {
    Boundary(BoundaryProperties),
    Poi(PoiProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            kind: "Feature",
            geometry,
            properties,
        }
    }

    pub fn point(coordinate: &Coordinate, properties: PoiProperties) -> Self {
        Self::new(
            Geometry::Point {
                coordinates: coordinate.lon_lat(),
            },
            FeatureProperties::Poi(properties),
        )
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.properties, FeatureProperties::Boundary(_))
    }

    pub fn poi(&self) -> Option<&PoiProperties> {
        match &self.properties {
            FeatureProperties::Poi(props) => Some(props),
            FeatureProperties::Boundary(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &PoiProperties> {
        self.features.iter().filter_map(Feature::poi)
    }
}

/// The queried area: its label and rectangular extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub bbox: BoundingBox,
}

impl Boundary {
    pub fn new(area: &str, city: &str, bbox: BoundingBox) -> Self {
        Self {
            name: format!("{area}, {city}"),
            bbox,
        }
    }

    pub fn feature(&self) -> Feature {
        Feature::new(
            Geometry::Polygon {
                coordinates: vec![self.bbox.ring()],
            },
            FeatureProperties::Boundary(BoundaryProperties {
                name: self.name.clone(),
                stroke_color: BOUNDARY_COLOR,
                stroke_width: 2,
                fill_color: BOUNDARY_COLOR,
                fill_opacity: 0.2,
            }),
        )
    }
}
