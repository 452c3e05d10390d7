pub mod error;
pub mod query;
pub mod types;

pub use error::{OverpassError, Result};
pub use query::{FeatureQuery, EMISSION_SOURCE_FILTERS};
pub use types::{Element, OverpassResponse};

use envimap_common::RawFeature;

const BASE_URL: &str = "https://overpass-api.de/api";

pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for OverpassClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OverpassClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run a raw Overpass QL query.
    pub async fn interpret(&self, ql: &str) -> Result<OverpassResponse> {
        let url = format!("{}/interpreter", self.base_url);
        let resp = self
            .client
            .post(&url)
            .body(ql.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OverpassError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch every emission-source element matched by `query`.
    pub async fn fetch_features(&self, query: &FeatureQuery) -> Result<Vec<RawFeature>> {
        let response = self.interpret(&query.to_ql()).await?;

        if let Some(remark) = &response.remark {
            tracing::warn!(remark = %remark, "Overpass returned a remark; results may be partial");
        }

        let total = response.elements.len();
        let features: Vec<RawFeature> = response
            .elements
            .into_iter()
            .filter_map(Element::into_feature)
            .collect();

        tracing::info!(
            lat = query.center.lat,
            lon = query.center.lon,
            radius_m = query.radius_m,
            elements = total,
            features = features.len(),
            "Fetched Overpass features"
        );
        Ok(features)
    }
}
