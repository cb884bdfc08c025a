use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::{Config, ConfigError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("request to {model} failed: {message}")]
    RequestFailed { model: String, message: String },

    #[error("request to {model} timed out after {seconds}s")]
    Timeout { model: String, seconds: u64 },

    #[error("{model} returned no content")]
    EmptyResponse { model: String },
}

/// The single outbound boundary: prompt text in, completion text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            timeout: Duration::from_secs(config.completion_timeout_secs),
        })
    }

    fn request_failed(&self, err: OpenAIError) -> CompletionError {
        CompletionError::RequestFailed {
            model: self.model_name.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        log::debug!(
            "Sending completion request to {} ({} prompt chars)",
            self.model_name,
            prompt.chars().count()
        );

        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| self.request_failed(e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_message)])
            .temperature(self.temperature)
            .build()
            .map_err(|e| self.request_failed(e))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| CompletionError::Timeout {
                model: self.model_name.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| {
                log::warn!("Completion request to {} failed: {}", self.model_name, e);
                self.request_failed(e)
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| CompletionError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        log::debug!(
            "Received completion from {} ({} chars)",
            self.model_name,
            content.chars().count()
        );

        Ok(content)
    }
}
