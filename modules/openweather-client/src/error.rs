use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenWeatherError>;

#[derive(Debug, Error)]
pub enum OpenWeatherError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No air quality data available")]
    NoData,
}

impl From<reqwest::Error> for OpenWeatherError {
    fn from(err: reqwest::Error) -> Self {
        OpenWeatherError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for OpenWeatherError {
    fn from(err: serde_json::Error) -> Self {
        OpenWeatherError::Parse(err.to_string())
    }
}
