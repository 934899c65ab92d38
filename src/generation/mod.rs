//! Story and example sentence generation
//!
//! The review flow only depends on the `TextGenerator` trait. `OpenAiClient`
//! is the production implementation; tests substitute their own.

pub mod jobs;
pub mod openai;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jobs::{JobHandle, JobRegistry, JobStatus, StoryRequest, StoryResult};
pub use openai::OpenAiClient;

/// Text shown in place of generated content when generation fails
pub const GENERATION_PLACEHOLDER: &str = "Text generation is unavailable right now.";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("No API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options for one completion
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            max_tokens: 500,
        }
    }
}

/// Anything that can turn chat messages into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;

    /// Options to use when the caller has no preference
    fn default_options(&self) -> GenerationOptions {
        GenerationOptions::default()
    }
}

/// Run a generation, substituting the placeholder on failure
pub async fn generate_or_placeholder(
    generator: &dyn TextGenerator,
    messages: &[ChatMessage],
    options: &GenerationOptions,
) -> String {
    match generator.generate(messages, options).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Text generation failed: {}", e);
            GENERATION_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Generators for tests

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Answers from a fixed script, cycling when exhausted
    pub struct ScriptedGenerator {
        replies: Vec<String>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn new(replies: &[&str]) -> Self {
            Self {
                replies: replies.iter().map(|r| r.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _messages: &[ChatMessage],
            _options: &GenerationOptions,
        ) -> Result<String, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.replies.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(self.replies[n % self.replies.len()].clone())
        }
    }

    /// Always fails
    pub struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(
            &self,
            _messages: &[ChatMessage],
            _options: &GenerationOptions,
        ) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FailingGenerator, ScriptedGenerator};
    use super::*;

    #[tokio::test]
    async fn test_placeholder_on_failure() {
        let text = generate_or_placeholder(
            &FailingGenerator,
            &[ChatMessage::user("hi")],
            &GenerationOptions::default(),
        )
        .await;
        assert_eq!(text, GENERATION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let generator = ScriptedGenerator::new(&["Hallo"]);
        let text = generate_or_placeholder(
            &generator,
            &[ChatMessage::user("hi")],
            &GenerationOptions::default(),
        )
        .await;
        assert_eq!(text, "Hallo");
        assert_eq!(generator.calls(), 1);
    }
}
