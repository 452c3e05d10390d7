use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::traits::{Message, MessageRole, PromptBuilder};

use super::types::*;
use super::Gemini;

pub struct GeminiPromptBuilder {
    agent: Gemini,
    input: String,
    preamble: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    messages: Vec<Message>,
}

impl GeminiPromptBuilder {
    pub(crate) fn new(agent: Gemini, input: String) -> Self {
        Self {
            agent,
            input,
            preamble: None,
            temperature: None,
            max_output_tokens: None,
            messages: Vec::new(),
        }
    }

    pub(crate) fn build_request(&self) -> GenerateRequest {
        let mut request = GenerateRequest::new();

        if let Some(temp) = self.temperature {
            request = request.temperature(temp);
        }
        if let Some(max_tokens) = self.max_output_tokens {
            request = request.max_output_tokens(max_tokens);
        }

        let mut system = self.preamble.clone().unwrap_or_default();

        for msg in &self.messages {
            match msg.role {
                MessageRole::System => {
                    // Gemini takes a single system instruction, merge into it
                    if !system.is_empty() {
                        system.push_str("\n\n");
                    }
                    system.push_str(&msg.content);
                }
                MessageRole::User => request = request.content(Content::user(&msg.content)),
                MessageRole::Assistant => request = request.content(Content::model(&msg.content)),
            }
        }

        if !system.is_empty() {
            request = request.system(system);
        }

        if !self.input.is_empty() {
            request = request.content(Content::user(&self.input));
        }

        request
    }
}

#[async_trait]
impl PromptBuilder for GeminiPromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn max_output_tokens(mut self, max_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_tokens);
        self
    }

    fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    async fn send(self) -> Result<String> {
        let request = self.build_request();
        let response = self
            .agent
            .client()
            .generate(&self.agent.model, &request)
            .await?;

        response
            .text()
            .ok_or_else(|| AiError::Empty(response.empty_reason()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Agent;
    use serde_json::json;

    #[test]
    fn system_messages_merge_into_preamble() {
        let builder = Gemini::new("key", "gemini-2.0-flash-lite")
            .prompt("What now?")
            .preamble("You are an analyst.")
            .messages(vec![
                Message::system("Answer in JSON."),
                Message::user("Earlier question"),
                Message::assistant("Earlier answer"),
            ]);
        let value = serde_json::to_value(builder.build_request()).unwrap();

        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "You are an analyst.\n\nAnswer in JSON."
        );
        let roles: Vec<&str> = value["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(value["contents"][2]["parts"][0]["text"], "What now?");
    }

    #[test]
    fn generation_config_is_carried() {
        let builder = Gemini::new("key", "m")
            .prompt("hi")
            .temperature(0.0)
            .max_output_tokens(512);
        let value = serde_json::to_value(builder.build_request()).unwrap();
        assert_eq!(
            value["generationConfig"],
            json!({"temperature": 0.0, "maxOutputTokens": 512})
        );
    }
}
