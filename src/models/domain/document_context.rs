use serde::{Deserialize, Serialize};

/// Normalized text of the active document and the statistics derived from it.
///
/// Built once per upload by the preprocessor and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentContext {
    pub full_text: String,
    pub sentences: Vec<String>,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
    pub char_count: usize,
}

impl DocumentContext {
    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }
}
