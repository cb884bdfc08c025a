//! Turns free-text completions into structured results.
//!
//! The model is asked to prefix each field with a fixed label (`ANSWER:`,
//! `SCORE:` ...). Nothing guarantees it complies, so every routine has a
//! fallback and reports through [`Parsed::fallback`] when it had to use one.
//! A strict JSON read is attempted first; the label scan is the normal path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    constants::prompts::{
        ANSWER_FALLBACK_JUSTIFICATION, ANSWER_FALLBACK_SNIPPET, ANSWER_LABEL,
        EVALUATION_FALLBACK_JUSTIFICATION, FEEDBACK_LABEL, GUIDANCE_LABEL_PREFIX,
        JUSTIFICATION_LABEL, QUESTION_LABEL_PREFIX, REFERENCE_LABEL, SCORE_LABEL,
        SOURCE_SNIPPET_LABEL, TYPE_LABEL_PREFIX,
    },
    models::domain::{
        challenge_question::{CHALLENGE_SET_SIZE, DEFAULT_GUIDANCE},
        Answer, ChallengeQuestion, ChallengeQuestionType, Evaluation, Score,
    },
};

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("DIGIT_RUN is a valid regex pattern"));

/// A parsed value plus whether placeholders had to stand in for missing labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub fallback: bool,
}

impl<T> Parsed<T> {
    fn exact(value: T) -> Self {
        Self {
            value,
            fallback: false,
        }
    }

    fn degraded(value: T) -> Self {
        Self {
            value,
            fallback: true,
        }
    }
}

pub trait ResponseParser: Send + Sync {
    fn parse_answer(&self, completion: &str) -> Parsed<Answer>;
    fn parse_challenge_set(&self, completion: &str) -> Parsed<Vec<ChallengeQuestion>>;
    fn parse_evaluation(&self, completion: &str) -> Parsed<Evaluation>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LabelResponseParser;

impl ResponseParser for LabelResponseParser {
    fn parse_answer(&self, completion: &str) -> Parsed<Answer> {
        if let Some(answer) =
            read_structured::<Answer>(completion).filter(|a| !a.answer.trim().is_empty())
        {
            return finish_answer(
                answer.answer,
                Some(answer.justification),
                Some(answer.source_snippet),
            );
        }

        let [answer, justification, source_snippet] = scan_fields(
            completion,
            [
                Field::continued(ANSWER_LABEL),
                Field::continued(JUSTIFICATION_LABEL),
                Field::continued(SOURCE_SNIPPET_LABEL),
            ],
        );

        match answer.filter(|a| !a.is_empty()) {
            Some(answer) => finish_answer(answer, justification, source_snippet),
            None => {
                log::debug!("Answer completion had no ANSWER label; using raw text");
                Parsed::degraded(Answer {
                    answer: completion.trim().to_string(),
                    justification: ANSWER_FALLBACK_JUSTIFICATION.to_string(),
                    source_snippet: ANSWER_FALLBACK_SNIPPET.to_string(),
                })
            }
        }
    }

    fn parse_challenge_set(&self, completion: &str) -> Parsed<Vec<ChallengeQuestion>> {
        if let Some(structured) = read_structured::<StructuredChallengeSet>(completion) {
            let drafts: Vec<QuestionDraft> = structured
                .into_questions()
                .into_iter()
                .map(QuestionDraft::from)
                .collect();
            if drafts.iter().any(|d| !d.question.trim().is_empty()) {
                return finish_challenge_set(drafts);
            }
        }

        let drafts = scan_question_blocks(completion);
        if drafts.iter().all(|d| d.question.trim().is_empty()) && !completion.trim().is_empty() {
            log::debug!("Challenge completion had no QUESTION labels; using raw text");
            let mut parsed = finish_challenge_set(vec![QuestionDraft {
                question: completion.trim().to_string(),
                question_type: None,
                guidance: None,
            }]);
            parsed.fallback = true;
            return parsed;
        }

        finish_challenge_set(drafts)
    }

    fn parse_evaluation(&self, completion: &str) -> Parsed<Evaluation> {
        if let Some(structured) = read_structured::<StructuredEvaluation>(completion)
            .filter(|e| !e.feedback.trim().is_empty())
        {
            return finish_evaluation(
                completion,
                structured.score(),
                Some(structured.feedback),
                Some(structured.justification),
                Some(structured.reference),
            );
        }

        let [score, feedback, justification, reference] = scan_fields(
            completion,
            [
                Field::single_line(SCORE_LABEL),
                Field::continued(FEEDBACK_LABEL),
                Field::continued(JUSTIFICATION_LABEL),
                Field::continued(REFERENCE_LABEL),
            ],
        );

        finish_evaluation(
            completion,
            score.as_deref().map(extract_score),
            feedback,
            justification,
            reference,
        )
    }
}

/// An answer was found; a missing justification is replaced by the
/// placeholder and flagged. The snippet may stay empty.
fn finish_answer(
    answer: String,
    justification: Option<String>,
    source_snippet: Option<String>,
) -> Parsed<Answer> {
    let justification = justification.filter(|j| !j.trim().is_empty());
    let fallback = justification.is_none();
    if fallback {
        log::debug!("Answer completion had no justification; placeholder substituted");
    }

    Parsed {
        value: Answer {
            answer,
            justification: justification
                .unwrap_or_else(|| ANSWER_FALLBACK_JUSTIFICATION.to_string()),
            source_snippet: source_snippet.unwrap_or_default(),
        },
        fallback,
    }
}

fn finish_evaluation(
    completion: &str,
    score: Option<Score>,
    feedback: Option<String>,
    justification: Option<String>,
    reference: Option<String>,
) -> Parsed<Evaluation> {
    let mut fallback = score.is_none();
    let score = score.unwrap_or_default();

    let feedback = match feedback.filter(|f| !f.trim().is_empty()) {
        Some(feedback) => feedback,
        None => {
            fallback = true;
            completion.trim().to_string()
        }
    };

    let justification = match justification.filter(|j| !j.trim().is_empty()) {
        Some(justification) => justification,
        None => {
            fallback = true;
            EVALUATION_FALLBACK_JUSTIFICATION.to_string()
        }
    };

    if fallback {
        log::debug!("Evaluation completion was missing labels; placeholders substituted");
    }

    Parsed {
        value: Evaluation {
            score,
            feedback,
            justification,
            reference_content: reference.unwrap_or_default(),
        },
        fallback,
    }
}

/// `"<digits>%"` from the first digit run; otherwise the text itself.
pub fn extract_score(raw: &str) -> Score {
    let raw = raw.trim();
    if let Some(digits) = DIGIT_RUN.find(raw) {
        if let Ok(value) = digits.as_str().parse::<u64>() {
            return Score::percent(value);
        }
    }

    if raw.is_empty() {
        Score::unscored()
    } else {
        Score::Unscored(raw.to_string())
    }
}

#[derive(Clone, Copy, Debug)]
struct Field {
    label: &'static str,
    /// Whether unlabeled lines that follow extend this field.
    continued: bool,
}

impl Field {
    fn continued(label: &'static str) -> Self {
        Self {
            label,
            continued: true,
        }
    }

    fn single_line(label: &'static str) -> Self {
        Self {
            label,
            continued: false,
        }
    }
}

/// Line scan shared by the answer and evaluation shapes. A labeled line
/// (re)starts its field; later unlabeled lines append to the field under the
/// cursor. Text before the first label is dropped.
fn scan_fields<const N: usize>(completion: &str, fields: [Field; N]) -> [Option<String>; N] {
    let mut values: [Option<String>; N] = std::array::from_fn(|_| None);
    let mut cursor: Option<usize> = None;

    for line in completion.lines().map(str::trim) {
        let labeled = fields
            .iter()
            .enumerate()
            .find_map(|(index, field)| line.strip_prefix(field.label).map(|rest| (index, rest)));

        match labeled {
            Some((index, rest)) => {
                values[index] = Some(rest.trim().to_string());
                cursor = Some(index);
            }
            None if !line.is_empty() => {
                if let Some(index) = cursor.filter(|&i| fields[i].continued) {
                    append_line(values[index].get_or_insert_with(String::new), line);
                }
            }
            None => {}
        }
    }

    values
}

fn append_line(field: &mut String, line: &str) {
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(line);
}

#[derive(Clone, Debug, Default)]
struct QuestionDraft {
    question: String,
    question_type: Option<String>,
    guidance: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DraftCursor {
    Question,
    Guidance,
}

/// Text after the first colon, if the line has one.
fn label_value(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value.trim())
}

fn scan_question_blocks(completion: &str) -> Vec<QuestionDraft> {
    let mut drafts: Vec<QuestionDraft> = Vec::new();
    let mut cursor: Option<DraftCursor> = None;

    for line in completion.lines().map(str::trim) {
        if line.starts_with(QUESTION_LABEL_PREFIX) {
            drafts.push(QuestionDraft {
                question: label_value(line).unwrap_or(line).to_string(),
                ..QuestionDraft::default()
            });
            cursor = Some(DraftCursor::Question);
        } else if line.starts_with(TYPE_LABEL_PREFIX) {
            if let Some(draft) = drafts.last_mut() {
                draft.question_type = label_value(line).map(str::to_string);
            }
            cursor = None;
        } else if line.starts_with(GUIDANCE_LABEL_PREFIX) {
            if let Some(draft) = drafts.last_mut() {
                draft.guidance = label_value(line).map(str::to_string);
                cursor = Some(DraftCursor::Guidance);
            }
        } else if !line.is_empty() {
            let Some(draft) = drafts.last_mut() else {
                continue;
            };
            match cursor {
                Some(DraftCursor::Question) => append_line(&mut draft.question, line),
                Some(DraftCursor::Guidance) => {
                    append_line(draft.guidance.get_or_insert_with(String::new), line)
                }
                None => {}
            }
        }
    }

    drafts
}

/// Exactly three questions: blank drafts dropped, extras cut, gaps padded
/// with synthetic questions whose types cycle through the three kinds.
fn finish_challenge_set(drafts: Vec<QuestionDraft>) -> Parsed<Vec<ChallengeQuestion>> {
    let mut questions: Vec<ChallengeQuestion> = drafts
        .into_iter()
        .filter(|draft| !draft.question.trim().is_empty())
        .take(CHALLENGE_SET_SIZE)
        .map(|draft| {
            let question_type = draft
                .question_type
                .as_deref()
                .and_then(ChallengeQuestionType::from_label)
                .unwrap_or(ChallengeQuestionType::Comprehension);
            let guidance = draft
                .guidance
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GUIDANCE.to_string());
            ChallengeQuestion::new(draft.question.trim(), question_type, guidance)
        })
        .collect();

    let parsed_count = questions.len();
    questions.extend((parsed_count..CHALLENGE_SET_SIZE).map(ChallengeQuestion::synthetic));

    if parsed_count < CHALLENGE_SET_SIZE {
        log::debug!(
            "Challenge completion yielded {} question(s); padded to {}",
            parsed_count,
            CHALLENGE_SET_SIZE
        );
        Parsed::degraded(questions)
    } else {
        Parsed::exact(questions)
    }
}

/// Strict read of a JSON reply, with or without a markdown code fence.
fn read_structured<T: DeserializeOwned>(completion: &str) -> Option<T> {
    let body = strip_code_fence(completion.trim());
    if !(body.starts_with('{') || body.starts_with('[')) {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StructuredChallengeSet {
    List(Vec<StructuredQuestion>),
    Wrapped { questions: Vec<StructuredQuestion> },
}

impl StructuredChallengeSet {
    fn into_questions(self) -> Vec<StructuredQuestion> {
        match self {
            StructuredChallengeSet::List(questions) => questions,
            StructuredChallengeSet::Wrapped { questions } => questions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StructuredQuestion {
    question: String,
    #[serde(default, rename = "type")]
    question_type: Option<String>,
    #[serde(default, alias = "guidance")]
    answer_guidance: Option<String>,
}

impl From<StructuredQuestion> for QuestionDraft {
    fn from(question: StructuredQuestion) -> Self {
        QuestionDraft {
            question: question.question,
            question_type: question.question_type,
            guidance: question.answer_guidance,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StructuredEvaluation {
    #[serde(default)]
    score: serde_json::Value,
    feedback: String,
    #[serde(default)]
    justification: String,
    #[serde(default, alias = "reference_content")]
    reference: String,
}

impl StructuredEvaluation {
    /// `None` when the reply carried no usable score.
    fn score(&self) -> Option<Score> {
        match &self.score {
            serde_json::Value::Number(number) => number
                .as_u64()
                .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u64))
                .map(Score::percent),
            serde_json::Value::String(text) => Some(extract_score(text)),
            _ => None,
        }
    }
}
