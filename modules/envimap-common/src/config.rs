use std::env;

use crate::error::EnviMapError;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";

/// Application configuration loaded from environment variables.
/// Read once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct Config {
    // Generative model
    pub google_api_key: String,
    pub gemini_model: String,

    // Environmental readings
    pub openweather_api_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, EnviMapError> {
        dotenvy::dotenv().ok();
        let config = Self::from_vars(|key| env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, EnviMapError> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let google_api_key = non_empty("GOOGLE_API_KEY").ok_or_else(|| {
            EnviMapError::Config("GOOGLE_API_KEY environment variable is required".to_string())
        })?;

        let web_port = match non_empty("WEB_PORT") {
            Some(port) => port.parse().map_err(|_| {
                EnviMapError::Config(format!("WEB_PORT must be a number, got '{port}'"))
            })?,
            None => 8000,
        };

        Ok(Self {
            google_api_key,
            gemini_model: non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            openweather_api_key: non_empty("OPENWEATHER_API_KEY"),
            web_host: non_empty("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map_or(val.len(), |(i, _)| i);
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  GOOGLE_API_KEY: {}", preview(&self.google_api_key));
        tracing::info!("  GEMINI_MODEL: {}", self.gemini_model);
        tracing::info!(
            "  OPENWEATHER_API_KEY: {}",
            self.openweather_api_key
                .as_deref()
                .map_or_else(|| "<not set>".to_string(), preview)
        );
    }
}
