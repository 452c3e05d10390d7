//! The area-level assessment returned by the model, normalized.

use ai_client::util::json_object_span;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AnalyzeError;

/// Keys the model has been seen to use for the insight list, in lookup order.
const INSIGHT_KEYS: [&str; 4] = ["Key_Insights", "Key Insights", "key_insights", "insights"];

const DEFAULT_IMPACT: &str = "Medium";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub description: String,
    pub impact: String,
}

impl Insight {
    /// Strings become a Medium-impact insight; objects keep their fields.
    fn from_value(item: &Value) -> Self {
        match item {
            Value::String(text) => Self {
                description: text.clone(),
                impact: DEFAULT_IMPACT.to_string(),
            },
            Value::Object(fields) => Self {
                description: fields
                    .get("description")
                    .map(text_of)
                    .unwrap_or_else(|| item.to_string()),
                impact: fields
                    .get("impact")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_IMPACT)
                    .to_string(),
            },
            other => Self {
                description: other.to_string(),
                impact: DEFAULT_IMPACT.to_string(),
            },
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Serialized as the response's `environmental_impact`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub category: String,
    pub summary: String,
    pub ai_rating: Value,
    pub key_factors: Value,
    pub risks: Value,
    pub insights: Vec<Insight>,
}

impl Narrative {
    /// Parse the outermost `{...}` span of a model response.
    pub fn from_response(text: &str) -> Result<Self, AnalyzeError> {
        let span = json_object_span(text)
            .ok_or_else(|| AnalyzeError::Upstream("No JSON found in the response".to_string()))?;
        let value: Value = serde_json::from_str(span)
            .map_err(|e| AnalyzeError::Upstream(format!("Invalid JSON in the response: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(AnalyzeError::Upstream(
                "Response JSON is not an object".to_string(),
            ));
        };
        Ok(Self::from_fields(&fields))
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let string_field = |key: &str| fields.get(key).map(text_of).unwrap_or_default();

        let insights = INSIGHT_KEYS
            .iter()
            .find_map(|key| fields.get(*key))
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Insight::from_value).collect())
            .unwrap_or_default();

        Self {
            category: string_field("category"),
            summary: string_field("summary"),
            ai_rating: fields.get("ai_rating").cloned().unwrap_or(Value::from(0)),
            key_factors: fields
                .get("key_factors")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            risks: fields
                .get("risks")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            insights,
        }
    }
}
