use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::Category;
use crate::AppError;

pub mod parse;

pub use parse::parse_candidates;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Pinned so every deployment parses the same output shape.
pub const GENERATION_MODEL: &str = "llama-3.3-70b-versatile";
/// How many candidates the instruction asks for.
pub const CANDIDATE_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("generator returned empty content")]
    EmptyContent,
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e.to_string())
    }
}

/// Boundary to the external prompt generator. One call, one raw completion;
/// retrying is the admin's decision, never automatic.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(&self, category: Category, context: &str)
        -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// Production generator backed by the Groq chat-completions API.
#[derive(Clone)]
pub struct GroqGenerator {
    client: Client,
    api_key: String,
}

impl GroqGenerator {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CandidateGenerator for GroqGenerator {
    async fn generate(
        &self,
        category: Category,
        context: &str,
    ) -> Result<String, GenerationError> {
        let instruction = build_instruction(category, context);
        let request_body = ChatRequest {
            model: GENERATION_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &instruction,
            }],
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Quota, auth and validation failures all arrive in one shape
            let message = serde_json::from_str::<GroqError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyContent);
        }

        debug!(model = GENERATION_MODEL, "generator call succeeded");

        Ok(text)
    }
}

fn build_instruction(category: Category, context: &str) -> String {
    let mut instruction = format!(
        "You are an assistant that writes creative writing prompts. \
         Generate exactly {} short writing prompts (at most 15 words each), \
         evocative and concrete, for the category \"{}\".",
        CANDIDATE_COUNT, category
    );

    let context = context.trim();
    if !context.is_empty() {
        instruction.push_str(&format!(" Additional context: {}.", context));
    }

    instruction.push_str(&format!(
        " Return them as a numbered list from 1 to {}, with no additional text.",
        CANDIDATE_COUNT
    ));

    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_names_the_category() {
        let instruction = build_instruction(Category::Object, "");
        assert!(instruction.contains("\"object\""));
        assert!(!instruction.contains("Additional context"));
    }

    #[test]
    fn test_instruction_carries_trimmed_context() {
        let instruction = build_instruction(Category::Memory, "  rainy afternoons  ");
        assert!(instruction.contains("Additional context: rainy afternoons."));
    }
}
