use std::{env, str::FromStr};

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_LLM_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_LLM_MODEL_NAME: &str = "gemini-1.5-flash";

pub const SETUP_INSTRUCTIONS: &str = "API key not found. Set LLM_API_KEY (or GEMINI_API_KEY) before starting the server.

For local development:
  1. Create a .env file in the project root
  2. Add: LLM_API_KEY=your_api_key_here

For a deployed server, add LLM_API_KEY to the service environment.

Gemini keys can be created at https://makersuite.google.com/app/apikey";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}", SETUP_INSTRUCTIONS)]
    MissingApiKey,

    #[error("Environment variable {name} has invalid value '{value}'")]
    InvalidValue { name: String, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm_api_key: Option<SecretString>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub completion_timeout_secs: u64,
    /// Characters of the document embedded in the summary prompt.
    pub summary_context_chars: usize,
    pub summary_max_words: u32,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are discarded. Zero keeps them
    /// until they are ended explicitly.
    pub idle_session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_var("WEB_SERVER_PORT", 8080)?,
            llm_api_key,
            llm_api_base_url: env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE_URL.to_string()),
            llm_model_name: env::var("LLM_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_LLM_MODEL_NAME.to_string()),
            llm_temperature: parse_var("LLM_TEMPERATURE", 0.3)?,
            completion_timeout_secs: parse_var("COMPLETION_TIMEOUT_SECS", 60)?,
            summary_context_chars: parse_var("SUMMARY_CONTEXT_CHARS", 4000)?,
            summary_max_words: parse_var("SUMMARY_MAX_WORDS", 150)?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            idle_session_ttl_secs: parse_var("IDLE_SESSION_TTL_SECS", 2 * 60 * 60)?,
        })
    }

    /// Returns the API key or the setup error shown to the user.
    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.llm_api_key.as_ref().ok_or(ConfigError::MissingApiKey)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            llm_api_key: Some(SecretString::from("test_api_key".to_string())),
            llm_api_base_url: "http://localhost:9999/v1".to_string(),
            llm_model_name: "test-model".to_string(),
            llm_temperature: 0.0,
            completion_timeout_secs: 5,
            summary_context_chars: 4000,
            summary_max_words: 150,
            max_upload_bytes: 1024 * 1024,
            idle_session_ttl_secs: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
