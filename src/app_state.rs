use std::sync::Arc;

use crate::{
    config::{Config, ConfigError},
    repositories::InMemorySessionRepository,
    services::{
        completion_client::{CompletionClient, OpenAiCompletionClient},
        response_parser::LabelResponseParser,
        session_service::SessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the production completion client. Fails only when no API key
    /// is configured.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let completion_client = Arc::new(OpenAiCompletionClient::new(&config)?);
        Ok(Self::with_client(config, completion_client))
    }

    pub fn with_client(config: Config, completion_client: Arc<dyn CompletionClient>) -> Self {
        let repository = Arc::new(InMemorySessionRepository::new());
        let session_service = Arc::new(SessionService::new(
            repository,
            completion_client,
            Arc::new(LabelResponseParser),
            &config,
        ));

        Self {
            session_service,
            config: Arc::new(config),
        }
    }
}
