use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, GenerationError, GenerationOptions, TextGenerator};
use crate::config::LlmConfig;

/// Client for an OpenAI-compatible chat completion API
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            // Normalize URL - ensure no trailing slash
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pull the first choice's text out of a completion response body
fn extract_content(body: &str) -> Result<String, GenerationError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Api {
            status: 200,
            message: format!("Unreadable completion response: {}", e),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        log::debug!(
            "Requesting completion from {} ({} messages)",
            options.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            status if status.is_success() => extract_content(&body),
            status => Err(GenerationError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    fn default_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: 0.0,
            max_tokens: self.max_tokens,
        }
    }
}
