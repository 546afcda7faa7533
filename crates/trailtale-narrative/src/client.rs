//! Chat-completions storyteller client.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The
//! request timeout lives on the underlying HTTP client, so a hung
//! service surfaces as an ordinary `GameError::Generation` and the
//! worker falls back locally.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use trailtale_core::error::GameError;
use trailtale_core::storyteller::{StoryRequest, Storyteller};

use crate::prompt;

/// Connection settings for the external generation service.
#[derive(Debug, Clone)]
pub struct StorytellerConfig {
    /// Base URL of the service, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Hard deadline for one generation call.
    pub timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Reqwest-backed `Storyteller` for OpenAI-compatible services.
pub struct ChatStoryteller {
    client: reqwest::Client,
    config: StorytellerConfig,
}

impl ChatStoryteller {
    /// Builds the client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the HTTP client cannot be
    /// constructed.
    pub fn new(config: StorytellerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Storyteller for ChatStoryteller {
    async fn continue_story(&self, request: &StoryRequest) -> Result<String, GameError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: self.config.model.clone(),
            temperature: 0.8,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt::SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt::user_prompt(request),
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GameError::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GameError::Generation(format!(
                "service returned HTTP {status}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GameError::Generation(format!("malformed response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GameError::Generation("response contained no text".to_owned()))
    }
}
