use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::{
    ChallengeQuestion, ChallengeQuestionType, ContentType, ConversationEntry, DocumentState,
    Evaluation, Score, ScoreBand, Session,
};

#[derive(Debug, Clone, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionCreatedResponse {
    fn from(session: &Session) -> Self {
        SessionCreatedResponse {
            session_id: session.id,
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub filename: String,
    pub content_type: ContentType,
    pub content_hash: String,
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
}

impl From<&DocumentState> for DocumentStats {
    fn from(document: &DocumentState) -> Self {
        DocumentStats {
            filename: document.filename.clone(),
            content_type: document.content_type,
            content_hash: document.content_hash.clone(),
            word_count: document.context.word_count,
            char_count: document.context.char_count,
            sentence_count: document.context.sentence_count(),
            paragraph_count: document.context.paragraph_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub stats: DocumentStats,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub document_id: Uuid,
    pub max_words: u32,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub justification: String,
    pub source_snippet: String,
    pub timestamp: String,
    /// Whether the exchange was added to the conversation history.
    pub recorded: bool,
    pub parse_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub document_id: Uuid,
    pub entries: Vec<ConversationEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeSetResponse {
    pub document_id: Uuid,
    pub questions: Vec<ChallengeQuestion>,
    pub parse_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub question_index: usize,
    pub question: String,
    pub question_type: ChallengeQuestionType,
    pub score: Score,
    pub score_display: String,
    pub score_band: Option<ScoreBand>,
    pub feedback: String,
    pub justification: String,
    pub reference_content: String,
    pub parse_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl EvaluationResponse {
    pub fn new(
        question_index: usize,
        question: &ChallengeQuestion,
        evaluation: Evaluation,
        parse_fallback: bool,
        notice: Option<String>,
    ) -> Self {
        EvaluationResponse {
            question_index,
            question: question.question.clone(),
            question_type: question.question_type,
            score_display: evaluation.score.display(),
            score_band: evaluation.score.band(),
            score: evaluation.score,
            feedback: evaluation.feedback,
            justification: evaluation.justification,
            reference_content: evaluation.reference_content,
            parse_fallback,
            notice,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSnapshot {
    pub document_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
    pub stats: DocumentStats,
    pub summary: String,
    pub conversation_length: usize,
    pub challenge_set: Vec<ChallengeQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub document: Option<DocumentSnapshot>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        SessionSnapshot {
            session_id: session.id,
            created_at: session.created_at,
            modified_at: session.modified_at,
            document: session.document.as_ref().map(|document| DocumentSnapshot {
                document_id: document.document_id,
                uploaded_at: document.uploaded_at,
                stats: DocumentStats::from(document),
                summary: document.summary.clone(),
                conversation_length: document.conversation.len(),
                challenge_set: document.challenge_set.clone(),
            }),
        }
    }
}
