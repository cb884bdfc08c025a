use crate::{
    constants::prompts::{
        ANSWER_FORMAT, ASSISTANT_ROLE_INSTRUCTION, CHALLENGE_FORMAT, CHALLENGE_REQUIREMENTS,
        EVALUATION_CRITERIA, EVALUATION_FORMAT, SUMMARY_INSTRUCTION,
    },
    models::domain::{ChallengeQuestionType, DocumentContext},
};

pub const DEFAULT_SUMMARY_CONTEXT_CHARS: usize = 4000;

/// Renders the four prompt templates. Pure: same inputs, same prompt.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    summary_context_chars: usize,
}

impl PromptBuilder {
    pub fn new(summary_context_chars: usize) -> Self {
        Self {
            summary_context_chars,
        }
    }

    /// Only the first `summary_context_chars` characters are embedded; the
    /// rest of a long document does not reach the model.
    pub fn summarize(&self, document: &DocumentContext, max_words: u32) -> String {
        let excerpt = truncate_chars(&document.full_text, self.summary_context_chars);
        format!(
            "Please provide a concise summary of the following document in no more than {max_words} words.\n\
             {SUMMARY_INSTRUCTION}\n\n\
             Document:\n\
             {excerpt}\n\n\
             Summary (max {max_words} words):"
        )
    }

    pub fn answer(&self, document: &DocumentContext, question: &str) -> String {
        format!(
            "{ASSISTANT_ROLE_INSTRUCTION}\n\n\
             DOCUMENT CONTENT:\n\
             {}\n\n\
             QUESTION: {question}\n\n\
             {ANSWER_FORMAT}",
            document.full_text
        )
    }

    pub fn challenge(&self, document: &DocumentContext) -> String {
        format!(
            "Based on the document provided below, generate exactly 3 challenging questions that test deep comprehension and logical reasoning.\n\n\
             {CHALLENGE_REQUIREMENTS}\n\n\
             DOCUMENT CONTENT:\n\
             {}\n\n\
             {CHALLENGE_FORMAT}",
            document.full_text
        )
    }

    pub fn evaluate(
        &self,
        document: &DocumentContext,
        question: &str,
        question_type: ChallengeQuestionType,
        user_answer: &str,
    ) -> String {
        format!(
            "You are evaluating a student's answer to a comprehension question based on a document.\n\n\
             DOCUMENT CONTENT:\n\
             {}\n\n\
             QUESTION: {question}\n\
             QUESTION TYPE: {question_type}\n\n\
             STUDENT'S ANSWER: {user_answer}\n\n\
             {EVALUATION_CRITERIA}\n\n\
             {EVALUATION_FORMAT}",
            document.full_text
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_CONTEXT_CHARS)
    }
}

/// Prefix of at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
