pub mod error;
pub mod types;

pub use error::{NominatimError, Result};
pub use types::{GeocodedPlace, PlaceName, ReverseResult, SearchHit, FALLBACK_RADIUS_DEG};

use envimap_common::Coordinate;
use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying User-Agent.
const USER_AGENT: &str = "EnviMap/1.0";

/// Zoom level for reverse lookups: city/district granularity.
const REVERSE_ZOOM: &str = "10";

pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NominatimClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NominatimError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Forward-geocode free text to the single best match, if any.
    pub async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>> {
        let hits: Vec<SearchHit> = self
            .get_json("search", &[("q", query), ("format", "json"), ("limit", "1")])
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            tracing::debug!(query, "Nominatim search returned no results");
            return Ok(None);
        };

        let place = hit.into_place()?;
        tracing::info!(
            query,
            lat = place.coordinate.lat,
            lon = place.coordinate.lon,
            "Geocoded place"
        );
        Ok(Some(place))
    }

    /// Reverse-geocode a coordinate to city/area names.
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceName> {
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lon.to_string();
        let result: ReverseResult = self
            .get_json(
                "reverse",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("format", "json"),
                    ("zoom", REVERSE_ZOOM),
                ],
            )
            .await?;

        if let Some(error) = result.error {
            return Err(NominatimError::NotFound(error));
        }

        let name = result.place_name();
        tracing::info!(city = %name.city, area = %name.area, "Reverse geocoded coordinate");
        Ok(name)
    }
}
