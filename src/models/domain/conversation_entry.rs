use serde::{Deserialize, Serialize};

/// Structured answer scraped from a completion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub source_snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversationEntry {
    pub question: String,
    pub answer: String,
    pub justification: String,
    pub source_snippet: String,
    /// Local wall-clock time of the answer, `HH:MM:SS`.
    pub timestamp: String,
}

impl ConversationEntry {
    pub fn from_answer(question: &str, answer: &Answer, timestamp: impl Into<String>) -> Self {
        ConversationEntry {
            question: question.to_string(),
            answer: answer.answer.clone(),
            justification: answer.justification.clone(),
            source_snippet: answer.source_snippet.clone(),
            timestamp: timestamp.into(),
        }
    }
}
