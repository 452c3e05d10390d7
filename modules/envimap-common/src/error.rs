use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnviMapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for EnviMapError {
    fn from(err: serde_json::Error) -> Self {
        EnviMapError::Parse(err.to_string())
    }
}
