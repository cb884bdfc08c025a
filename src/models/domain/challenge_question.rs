use serde::{Deserialize, Serialize};

pub const CHALLENGE_SET_SIZE: usize = 3;

pub const DEFAULT_GUIDANCE: &str = "Think carefully about the document content";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeQuestionType {
    Comprehension,
    Analysis,
    Inference,
}

impl ChallengeQuestionType {
    pub const ALL: [ChallengeQuestionType; 3] = [
        ChallengeQuestionType::Comprehension,
        ChallengeQuestionType::Analysis,
        ChallengeQuestionType::Inference,
    ];

    /// Reads a model-written type label such as `"Analysis"` or `"[inference]"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|variant| label.contains(variant.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeQuestionType::Comprehension => "comprehension",
            ChallengeQuestionType::Analysis => "analysis",
            ChallengeQuestionType::Inference => "inference",
        }
    }

    /// Type used for the question at `index` when defaults have to be synthesized.
    pub fn cycled(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl std::fmt::Display for ChallengeQuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChallengeQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: ChallengeQuestionType,
    pub answer_guidance: String,
}

impl ChallengeQuestion {
    pub fn new(
        question: impl Into<String>,
        question_type: ChallengeQuestionType,
        answer_guidance: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            question_type,
            answer_guidance: answer_guidance.into(),
        }
    }

    /// Fixed stand-in question for slot `index`, used to pad a short set and
    /// as the whole set when the completion service is unavailable.
    pub fn synthetic(index: usize) -> Self {
        let question_type = ChallengeQuestionType::cycled(index);
        match question_type {
            ChallengeQuestionType::Comprehension => Self::new(
                "What is the main topic or purpose of this document?",
                question_type,
                "Look for the central theme and objective",
            ),
            ChallengeQuestionType::Analysis => Self::new(
                "What evidence or examples support the main arguments in the document?",
                question_type,
                "Identify specific supporting details and examples",
            ),
            ChallengeQuestionType::Inference => Self::new(
                "What conclusions or implications can be drawn from the information presented?",
                question_type,
                "Think about what the information suggests beyond what is explicitly stated",
            ),
        }
    }

    pub fn default_set() -> Vec<Self> {
        (0..CHALLENGE_SET_SIZE).map(Self::synthetic).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_serializes_lowercase() {
        let json = serde_json::to_string(&ChallengeQuestionType::Inference).unwrap();
        assert_eq!(json, "\"inference\"");
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<ChallengeQuestionType>("\"recall\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn question_type_from_label_is_lenient() {
        assert_eq!(
            ChallengeQuestionType::from_label("Analysis"),
            Some(ChallengeQuestionType::Analysis)
        );
        assert_eq!(
            ChallengeQuestionType::from_label("[inference]"),
            Some(ChallengeQuestionType::Inference)
        );
        assert_eq!(ChallengeQuestionType::from_label("recall"), None);
    }

    #[test]
    fn default_set_covers_every_type_once() {
        let set = ChallengeQuestion::default_set();

        assert_eq!(set.len(), CHALLENGE_SET_SIZE);
        let types: Vec<_> = set.iter().map(|q| q.question_type).collect();
        assert_eq!(types, ChallengeQuestionType::ALL.to_vec());
    }

    #[test]
    fn challenge_question_uses_type_as_json_key() {
        let question = ChallengeQuestion::synthetic(0);
        let value = serde_json::to_value(&question).unwrap();

        assert_eq!(value["type"], "comprehension");
        assert!(value.get("question_type").is_none());
    }
}
