//! Merging model-supplied per-point pollutant annotations with the lexicon.
//!
//! The model returns a JSON array of `{lat, lon, pollutants}` items whose
//! `pollutants` value is sometimes a list, sometimes an object, and sometimes
//! neither. Everything is normalized here; resolution never fails and always
//! yields a non-empty list.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::EnviMapError;
use crate::lexicon::pollutants_for;
use crate::types::{Category, Coordinate, PoiRecord, Tags};

/// Maximum number of points sent to the model for annotation.
pub const ANNOTATION_BATCH_LIMIT: usize = 20;

/// Normalized shape of one annotation's `pollutants` value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotatedPollutants {
    /// A list; non-string entries dropped, duplicates removed keeping first appearance.
    List(Vec<String>),
    /// An object; its keys are the pollutant names.
    Keys(Vec<String>),
    Invalid,
}

impl AnnotatedPollutants {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let mut names: Vec<String> = Vec::with_capacity(items.len());
                for name in items.iter().filter_map(Value::as_str) {
                    if !names.iter().any(|existing| existing == name) {
                        names.push(name.to_string());
                    }
                }
                AnnotatedPollutants::List(names)
            }
            Value::Object(map) => AnnotatedPollutants::Keys(map.keys().cloned().collect()),
            _ => AnnotatedPollutants::Invalid,
        }
    }

    /// Usable pollutant names, if any.
    pub fn names(&self) -> Option<&[String]> {
        match self {
            AnnotatedPollutants::List(names) | AnnotatedPollutants::Keys(names)
                if !names.is_empty() =>
            {
                Some(names.as_slice())
            }
            _ => None,
        }
    }
}

/// Per-point annotations keyed by exact coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    by_key: HashMap<String, AnnotatedPollutants>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coordinate: Coordinate, pollutants: AnnotatedPollutants) {
        self.by_key.insert(coordinate.key(), pollutants);
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<&AnnotatedPollutants> {
        self.by_key.get(&coordinate.key())
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Parse the JSON text of a model response.
    pub fn from_json(text: &str) -> Result<Self, EnviMapError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Read a parsed model response.
    ///
    /// Anything other than an array yields no annotations. Items without numeric
    /// `lat` and `lon` are skipped; a later item for the same coordinate replaces
    /// an earlier one.
    pub fn from_value(value: &Value) -> Self {
        let mut annotations = Self::new();
        let Some(items) = value.as_array() else {
            return annotations;
        };

        for item in items {
            let (Some(lat), Some(lon)) = (
                item.get("lat").and_then(Value::as_f64),
                item.get("lon").and_then(Value::as_f64),
            ) else {
                debug!(item = %item, "Skipping annotation without coordinates");
                continue;
            };
            let pollutants = item
                .get("pollutants")
                .map(AnnotatedPollutants::from_value)
                .unwrap_or(AnnotatedPollutants::Invalid);
            annotations.insert(Coordinate::new(lat, lon), pollutants);
        }

        annotations
    }
}

/// Pollutants for one point: the annotation when usable, the lexicon otherwise.
pub fn resolve_pollutants(
    coordinate: &Coordinate,
    category: &str,
    annotations: &Annotations,
) -> Vec<String> {
    annotations
        .get(coordinate)
        .and_then(AnnotatedPollutants::names)
        .map(<[String]>::to_vec)
        .unwrap_or_else(|| pollutants_for(category))
}

/// One point as presented to the model for annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationRequest {
    pub category: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub tags: Tags,
}

impl AnnotationRequest {
    pub fn new(category: &Category, record: &PoiRecord) -> Self {
        let name = if record.raw_name.is_empty() {
            "Unnamed POI".to_string()
        } else {
            record.raw_name.clone()
        };
        Self {
            category: category.as_str().to_string(),
            name,
            lat: record.coordinate.lat,
            lon: record.coordinate.lon,
            tags: record.raw_tags.clone(),
        }
    }
}
