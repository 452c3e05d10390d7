pub mod analyzer;
pub mod error;
pub mod health;
pub mod narrative;
pub mod prompts;
pub mod rest;
pub mod testing;
pub mod traits;

pub use analyzer::{AnalyzeRequest, AnalyzeResponse, AreaAnalyzer};
pub use error::AnalyzeError;
pub use rest::{router, AppState};
