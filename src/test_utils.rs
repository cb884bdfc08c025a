use crate::models::domain::{
    Answer, ContentType, ConversationEntry, DocumentState, UploadedFile,
};
use crate::services::text_preprocessor::preprocess;

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub const SAMPLE_TEXT: &str = "Rivers flow downhill toward the sea. Gravity drives the water.\n\n\
        Erosion shapes the valleys over time! Floods deposit rich soil on the plains.";

    pub const SAMPLE_SUMMARY: &str = "The document explains how rivers move and shape land.";

    pub const SAMPLE_ANSWER_COMPLETION: &str = "ANSWER: Downhill to the sea\n\
        JUSTIFICATION: First paragraph\n\
        SOURCE_SNIPPET: \"Rivers flow downhill toward the sea\"";

    pub const SAMPLE_CHALLENGE_COMPLETION: &str = "QUESTION_1: Why does water move toward the sea?\n\
        TYPE_1: comprehension\n\
        GUIDANCE_1: Read the first sentence\n\n\
        QUESTION_2: How are erosion and floods related?\n\
        TYPE_2: analysis\n\
        GUIDANCE_2: Compare the two paragraphs\n\n\
        QUESTION_3: What would the plains look like without floods?\n\
        TYPE_3: inference\n\
        GUIDANCE_3: Think about soil deposits";

    pub const SAMPLE_EVALUATION_COMPLETION: &str = "SCORE: approximately 87 out of 100\n\
        FEEDBACK: Correct and concise.\n\
        JUSTIFICATION: The text names gravity as the driver.\n\
        REFERENCE: \"Gravity drives the water\"";

    /// Plain-text upload named `rivers.txt`.
    pub fn text_upload(text: &str) -> UploadedFile {
        UploadedFile::new("rivers.txt", ContentType::Text, text.as_bytes().to_vec())
    }

    /// Document state for [`SAMPLE_TEXT`] with an empty history.
    pub fn sample_document_state() -> DocumentState {
        DocumentState::new(
            &text_upload(SAMPLE_TEXT),
            preprocess(SAMPLE_TEXT),
            SAMPLE_SUMMARY.to_string(),
        )
    }

    pub fn sample_entry(question: &str) -> ConversationEntry {
        let answer = Answer {
            answer: "Downhill to the sea".to_string(),
            justification: "First paragraph".to_string(),
            source_snippet: String::new(),
        };
        ConversationEntry::from_answer(question, &answer, "12:00:00")
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_sample_document_has_two_paragraphs() {
        let document = sample_document_state();
        assert_eq!(document.context.paragraphs.len(), 2);
        assert_eq!(document.context.sentences.len(), 4);
    }

    #[test]
    fn test_sample_text_contains_no_prompt_labels() {
        for label in ["SOURCE_SNIPPET:", "GUIDANCE_1:", "STUDENT'S ANSWER:", "Summary (max"] {
            assert!(!SAMPLE_TEXT.contains(label));
        }
    }

    #[test]
    fn test_sample_entry_uses_question() {
        let entry = sample_entry("Where?");
        assert_eq!(entry.question, "Where?");
        assert_eq!(entry.timestamp, "12:00:00");
    }
}
