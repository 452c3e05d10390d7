pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::{AiError, Result};
pub use gemini::{Gemini, GeminiPromptBuilder};
pub use traits::{Agent, Message, MessageRole, PromptBuilder};
