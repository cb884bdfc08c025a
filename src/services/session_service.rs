use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    constants::prompts::{
        ANSWER_ERROR_JUSTIFICATION, EVALUATION_ERROR_JUSTIFICATION, EVALUATION_ERROR_REFERENCE,
        SUMMARY_UNAVAILABLE,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{
            ChallengeQuestion, ConversationEntry, DocumentContext, DocumentState, Evaluation,
            Score, Session, UploadedFile,
        },
        dto::{
            request::{AskQuestionRequest, EvaluateAnswerRequest, SummaryRequest},
            response::{
                AnswerResponse, ChallengeSetResponse, ConversationResponse, DocumentStats,
                EvaluationResponse, SessionCreatedResponse, SessionSnapshot, SummaryResponse,
                UploadResponse,
            },
        },
    },
    repositories::{DocumentWrite, SessionRepository},
    services::{
        completion_client::{CompletionClient, CompletionError},
        prompt_builder::PromptBuilder,
        response_parser::ResponseParser,
        text_extractor::extract_text,
        text_preprocessor::preprocess,
    },
};

pub const STALE_DOCUMENT_NOTICE: &str =
    "The document was replaced while this request was running; the result was not saved.";

fn completion_notice(err: &CompletionError) -> String {
    format!("The language model could not be reached: {}", err)
}

fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Routes user actions through extraction, prompting and parsing, and keeps
/// the per-session document state in the repository.
///
/// Completion failures never become errors here: each action substitutes its
/// placeholder result and reports the failure in `notice`.
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    completion_client: Arc<dyn CompletionClient>,
    parser: Arc<dyn ResponseParser>,
    prompt_builder: PromptBuilder,
    summary_max_words: u32,
    max_upload_bytes: usize,
    idle_ttl: Option<chrono::Duration>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        completion_client: Arc<dyn CompletionClient>,
        parser: Arc<dyn ResponseParser>,
        config: &Config,
    ) -> Self {
        Self {
            repository,
            completion_client,
            parser,
            prompt_builder: PromptBuilder::new(config.summary_context_chars),
            summary_max_words: config.summary_max_words,
            max_upload_bytes: config.max_upload_bytes,
            idle_ttl: idle_ttl(config.idle_session_ttl_secs),
        }
    }

    pub fn idle_ttl(&self) -> Option<chrono::Duration> {
        self.idle_ttl
    }

    /// Discards sessions idle for longer than the configured TTL.
    pub async fn expire_idle_sessions(&self) -> AppResult<usize> {
        let Some(ttl) = self.idle_ttl else {
            return Ok(0);
        };

        let removed = self.repository.remove_idle(Utc::now() - ttl).await?;
        if removed > 0 {
            log::info!("Expired {} idle session(s)", removed);
        }
        Ok(removed)
    }

    pub async fn create_session(&self) -> AppResult<SessionCreatedResponse> {
        let session = self.repository.create(Session::new()).await?;
        log::info!("Created session {}", session.id);
        Ok(SessionCreatedResponse::from(&session))
    }

    pub async fn get_session(&self, id: &Uuid) -> AppResult<SessionSnapshot> {
        let session = self.load_session(id).await?;
        Ok(SessionSnapshot::from(&session))
    }

    pub async fn end_session(&self, id: &Uuid) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(session_not_found(id));
        }
        log::info!("Ended session {}", id);
        Ok(())
    }

    /// Extracts and summarizes the upload, then replaces the session's
    /// document wholesale. Nothing is stored if extraction fails.
    pub async fn upload_document(
        &self,
        id: &Uuid,
        upload: UploadedFile,
    ) -> AppResult<UploadResponse> {
        self.load_session(id).await?;

        if upload.bytes.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_upload_bytes,
            });
        }

        let raw_text = extract_text(&upload).await?;
        let context = preprocess(&raw_text);
        let (summary, notice) = self.summarize(&context, self.summary_max_words).await;

        let document = DocumentState::new(&upload, context, summary);
        let response = UploadResponse {
            document_id: document.document_id,
            stats: DocumentStats::from(&document),
            summary: document.summary.clone(),
            notice,
        };

        self.repository.replace_document(id, document).await?;
        log::info!(
            "Session {} loaded document {} ({} words)",
            id,
            response.document_id,
            response.stats.word_count
        );

        Ok(response)
    }

    pub async fn regenerate_summary(
        &self,
        id: &Uuid,
        request: SummaryRequest,
    ) -> AppResult<SummaryResponse> {
        request.validate()?;
        let max_words = request.max_words.unwrap_or(self.summary_max_words);

        let document = self.load_document(id).await?;
        let (summary, mut notice) = self.summarize(&document.context, max_words).await;

        let write = self
            .repository
            .replace_summary(id, &document.document_id, summary.clone())
            .await?;
        if write == DocumentWrite::Stale {
            notice.get_or_insert_with(|| STALE_DOCUMENT_NOTICE.to_string());
        }

        Ok(SummaryResponse {
            document_id: document.document_id,
            max_words,
            summary,
            notice,
        })
    }

    /// Answers from the full document text. Only successful completions are
    /// added to the conversation history.
    pub async fn ask_question(
        &self,
        id: &Uuid,
        request: AskQuestionRequest,
    ) -> AppResult<AnswerResponse> {
        request.validate()?;
        let question = request.question.trim();

        let document = self.load_document(id).await?;
        let prompt = self.prompt_builder.answer(&document.context, question);
        let timestamp = local_timestamp();

        let completion = match self.completion_client.complete(&prompt).await {
            Ok(completion) => completion,
            Err(err) => {
                log::warn!("Question on session {} failed: {}", id, err);
                return Ok(AnswerResponse {
                    question: question.to_string(),
                    answer: format!("Error processing question: {}", err),
                    justification: ANSWER_ERROR_JUSTIFICATION.to_string(),
                    source_snippet: String::new(),
                    timestamp,
                    recorded: false,
                    parse_fallback: false,
                    notice: Some(completion_notice(&err)),
                });
            }
        };

        let parsed = self.parser.parse_answer(&completion);
        let entry = ConversationEntry::from_answer(question, &parsed.value, timestamp);

        let write = self
            .repository
            .append_conversation(id, &document.document_id, entry.clone())
            .await?;
        let recorded = write == DocumentWrite::Applied;

        Ok(AnswerResponse {
            question: entry.question,
            answer: entry.answer,
            justification: entry.justification,
            source_snippet: entry.source_snippet,
            timestamp: entry.timestamp,
            recorded,
            parse_fallback: parsed.fallback,
            notice: (!recorded).then(|| STALE_DOCUMENT_NOTICE.to_string()),
        })
    }

    pub async fn conversation_history(&self, id: &Uuid) -> AppResult<ConversationResponse> {
        let document = self.load_document(id).await?;
        Ok(ConversationResponse {
            document_id: document.document_id,
            entries: document.conversation,
        })
    }

    /// Generates a fresh set of three questions, replacing any previous set.
    /// When the model is unavailable the fixed default set is stored instead.
    pub async fn generate_challenge_set(&self, id: &Uuid) -> AppResult<ChallengeSetResponse> {
        let document = self.load_document(id).await?;
        let prompt = self.prompt_builder.challenge(&document.context);

        let (questions, parse_fallback, mut notice) =
            match self.completion_client.complete(&prompt).await {
                Ok(completion) => {
                    let parsed = self.parser.parse_challenge_set(&completion);
                    (parsed.value, parsed.fallback, None)
                }
                Err(err) => {
                    log::warn!("Challenge generation on session {} failed: {}", id, err);
                    (
                        ChallengeQuestion::default_set(),
                        false,
                        Some(completion_notice(&err)),
                    )
                }
            };

        let write = self
            .repository
            .replace_challenge_set(id, &document.document_id, questions.clone())
            .await?;
        if write == DocumentWrite::Stale {
            notice.get_or_insert_with(|| STALE_DOCUMENT_NOTICE.to_string());
        }

        Ok(ChallengeSetResponse {
            document_id: document.document_id,
            questions,
            parse_fallback,
            notice,
        })
    }

    /// Grades an answer to question `index` (zero-based) of the current set.
    /// Nothing is stored.
    pub async fn evaluate_answer(
        &self,
        id: &Uuid,
        index: usize,
        request: EvaluateAnswerRequest,
    ) -> AppResult<EvaluationResponse> {
        request.validate()?;

        let document = self.load_document(id).await?;
        let question = document.challenge_set.get(index).ok_or_else(|| {
            AppError::NotFound(format!(
                "Challenge question {} not found ({} generated)",
                index,
                document.challenge_set.len()
            ))
        })?;

        let prompt = self.prompt_builder.evaluate(
            &document.context,
            &question.question,
            question.question_type,
            request.user_answer.trim(),
        );

        let response = match self.completion_client.complete(&prompt).await {
            Ok(completion) => {
                let parsed = self.parser.parse_evaluation(&completion);
                EvaluationResponse::new(index, question, parsed.value, parsed.fallback, None)
            }
            Err(err) => {
                log::warn!("Evaluation on session {} failed: {}", id, err);
                let evaluation = Evaluation {
                    score: Score::unscored(),
                    feedback: format!("Error evaluating answer: {}", err),
                    justification: EVALUATION_ERROR_JUSTIFICATION.to_string(),
                    reference_content: EVALUATION_ERROR_REFERENCE.to_string(),
                };
                EvaluationResponse::new(
                    index,
                    question,
                    evaluation,
                    false,
                    Some(completion_notice(&err)),
                )
            }
        };

        Ok(response)
    }

    async fn summarize(
        &self,
        context: &DocumentContext,
        max_words: u32,
    ) -> (String, Option<String>) {
        let prompt = self.prompt_builder.summarize(context, max_words);
        match self.completion_client.complete(&prompt).await {
            Ok(summary) => (summary, None),
            Err(err) => {
                log::warn!("Summary generation failed: {}", err);
                (SUMMARY_UNAVAILABLE.to_string(), Some(completion_notice(&err)))
            }
        }
    }

    async fn load_session(&self, id: &Uuid) -> AppResult<Session> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| session_not_found(id))
    }

    async fn load_document(&self, id: &Uuid) -> AppResult<DocumentState> {
        let session = self.load_session(id).await?;
        session.document.ok_or(AppError::NoDocument)
    }
}

fn idle_ttl(secs: u64) -> Option<chrono::Duration> {
    if secs == 0 {
        return None;
    }
    chrono::Duration::from_std(Duration::from_secs(secs)).ok()
}

/// Runs [`SessionService::expire_idle_sessions`] on a fixed tick. Returns
/// `None` when idle expiry is disabled.
pub fn spawn_idle_sweeper(service: Arc<SessionService>) -> Option<JoinHandle<()>> {
    let ttl = service.idle_ttl()?.to_std().ok()?;
    let period = (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(300));

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = service.expire_idle_sessions().await {
                log::error!("Idle session sweep failed: {}", e);
            }
        }
    }))
}

fn session_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Session with id '{}' not found", id))
}
