use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AskQuestionRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 2000)
    )]
    pub question: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluateAnswerRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 5000)
    )]
    pub user_answer: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(range(min = 10, max = 1000))]
    pub max_words: Option<u32>,
}

/// Query string of the upload endpoint; the body is the raw file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

impl UploadQuery {
    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
    }
}
