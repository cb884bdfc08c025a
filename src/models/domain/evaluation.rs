use serde::{Deserialize, Serialize};

pub const UNSCORED: &str = "N/A";

/// Outcome of grading an answer: either the digits the model gave or an
/// explicit marker carrying whatever it wrote instead of a number.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    Percent(u64),
    Unscored(String),
}

/// Coarse grade used to pick the feedback style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl Score {
    pub fn unscored() -> Self {
        Score::Unscored(UNSCORED.to_string())
    }

    /// Kept as reported, even above 100.
    pub fn percent(value: u64) -> Self {
        Score::Percent(value)
    }

    pub fn as_percent(&self) -> Option<u64> {
        match self {
            Score::Percent(value) => Some(*value),
            Score::Unscored(_) => None,
        }
    }

    /// 80 and up is strong, 60 and up is fair. Unscored answers have no band.
    pub fn band(&self) -> Option<ScoreBand> {
        self.as_percent().map(|value| match value {
            80.. => ScoreBand::Strong,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        })
    }

    pub fn display(&self) -> String {
        match self {
            Score::Percent(value) => format!("{}%", value),
            Score::Unscored(raw) => raw.clone(),
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::unscored()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Evaluation {
    pub score: Score,
    pub feedback: String,
    pub justification: String,
    pub reference_content: String,
}
