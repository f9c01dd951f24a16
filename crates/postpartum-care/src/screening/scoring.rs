use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::questions::{get_question, QUESTION_COUNT, SELF_HARM_QUESTION};

/// Standard EPDS cutoff for probable postpartum depression.
pub const PPD_CUTOFF: u8 = 10;
pub const MAX_TOTAL_SCORE: u8 = 30;

/// Triage outcome of a completed questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCategory {
    BabyBlues,
    Ppd,
    PsychosisWarning,
}

impl ResultCategory {
    /// Item 10 overrides the total; otherwise the clinical cutoff decides.
    pub const fn classify(total_score: u8, q10_score: u8) -> Self {
        if q10_score >= 1 {
            Self::PsychosisWarning
        } else if total_score >= PPD_CUTOFF {
            Self::Ppd
        } else {
            Self::BabyBlues
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "baby_blues" => Some(Self::BabyBlues),
            "ppd" => Some(Self::Ppd),
            "psychosis_warning" => Some(Self::PsychosisWarning),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BabyBlues => "baby_blues",
            Self::Ppd => "ppd",
            Self::PsychosisWarning => "psychosis_warning",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BabyBlues => "Baby blues",
            Self::Ppd => "Probable postpartum depression",
            Self::PsychosisWarning => "Urgent: thoughts of self-harm reported",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Self::BabyBlues => {
                "Your answers are below the screening threshold. Mood swings in the weeks after birth are common; keep resting, lean on your support network, and screen again if things feel heavier."
            }
            Self::Ppd => {
                "Your score suggests probable postpartum depression. Please share these results with your doctor, midwife, or health visitor soon so they can talk through support and treatment."
            }
            Self::PsychosisWarning => {
                "You reported thoughts of harming yourself. Please reach out now: call or text 988, contact Postpartum Support International, or call emergency services if you are in immediate danger."
            }
        }
    }

    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::PsychosisWarning)
    }
}

/// Why an answer sheet could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("please answer question {question}")]
    IncompleteSubmission { question: u8 },
    #[error("question {question} has invalid answer '{value}'; expected 0, 1, 2 or 3")]
    InvalidAnswer { question: u8, value: String },
    #[error("'{field}' does not name a screening question")]
    UnknownQuestion { field: String },
}

impl ScoringError {
    pub fn question(&self) -> Option<u8> {
        match self {
            ScoringError::IncompleteSubmission { question }
            | ScoringError::InvalidAnswer { question, .. } => Some(*question),
            ScoringError::UnknownQuestion { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RawAnswer {
    Value(i64),
    Malformed(String),
}

/// Answers as collected from a form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<u8, RawAnswer>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer for `question`; numbers outside 1..=10 are rejected.
    pub fn insert(&mut self, question: u8, value: i64) -> Result<(), ScoringError> {
        let question = checked_question(question)?;
        self.answers.insert(question, RawAnswer::Value(value));
        Ok(())
    }

    pub fn with_answer(mut self, question: u8, value: i64) -> Result<Self, ScoringError> {
        self.insert(question, value)?;
        Ok(self)
    }

    /// Builds a sheet from answers listed in question order.
    pub fn from_ordered<I>(values: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut sheet = Self::new();
        for (index, value) in values.into_iter().enumerate() {
            let question =
                u8::try_from(index + 1).map_err(|_| ScoringError::UnknownQuestion {
                    field: (index + 1).to_string(),
                })?;
            sheet.insert(question, value)?;
        }
        Ok(sheet)
    }

    /// Accepts form-style fields (`q1`..`q10` or bare `1`..`10`). Null and blank values
    /// count as unanswered; non-integer values are kept so scoring can report them.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut sheet = Self::new();
        for (field, value) in fields {
            let question = parse_field_name(field)?;
            let raw = match value {
                Value::Null => continue,
                Value::Number(number) => match number.as_i64() {
                    Some(parsed) => RawAnswer::Value(parsed),
                    None => RawAnswer::Malformed(number.to_string()),
                },
                Value::String(text) if text.trim().is_empty() => continue,
                Value::String(text) => match text.trim().parse::<i64>() {
                    Ok(parsed) => RawAnswer::Value(parsed),
                    Err(_) => RawAnswer::Malformed(text.clone()),
                },
                other => RawAnswer::Malformed(other.to_string()),
            };
            sheet.answers.insert(question, raw);
        }
        Ok(sheet)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

fn checked_question(question: u8) -> Result<u8, ScoringError> {
    if (1..=QUESTION_COUNT).contains(&question) {
        Ok(question)
    } else {
        Err(ScoringError::UnknownQuestion {
            field: question.to_string(),
        })
    }
}

fn parse_field_name(field: &str) -> Result<u8, ScoringError> {
    let trimmed = field.trim();
    let digits = trimmed
        .strip_prefix('q')
        .or_else(|| trimmed.strip_prefix('Q'))
        .unwrap_or(trimmed);

    digits
        .parse::<u8>()
        .ok()
        .and_then(|question| checked_question(question).ok())
        .ok_or_else(|| ScoringError::UnknownQuestion {
            field: field.to_string(),
        })
}

/// Validated result of scoring a complete answer sheet.
///
/// The per-question values and the totals are produced together, so the stored responses
/// always sum to `total_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreeningOutcome {
    answers: [u8; QUESTION_COUNT as usize],
    total_score: u8,
    q10_score: u8,
    category: ResultCategory,
}

impl ScreeningOutcome {
    pub fn total_score(&self) -> u8 {
        self.total_score
    }

    pub fn q10_score(&self) -> u8 {
        self.q10_score
    }

    pub fn category(&self) -> ResultCategory {
        self.category
    }

    /// `(question_number, answer_value)` pairs in question order.
    pub fn responses(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.answers
            .iter()
            .enumerate()
            .map(|(index, value)| (index as u8 + 1, *value))
    }
}

pub fn score(sheet: &AnswerSheet) -> Result<ScreeningOutcome, ScoringError> {
    if let Some(missing) =
        (1..=QUESTION_COUNT).find(|question| !sheet.answers.contains_key(question))
    {
        return Err(ScoringError::IncompleteSubmission { question: missing });
    }

    let mut answers = [0u8; QUESTION_COUNT as usize];
    for (question, raw) in &sheet.answers {
        let value = match raw {
            RawAnswer::Value(value) => *value,
            RawAnswer::Malformed(text) => {
                return Err(ScoringError::InvalidAnswer {
                    question: *question,
                    value: text.clone(),
                })
            }
        };

        let accepted = get_question(u32::from(*question))
            .map(|entry| entry.accepts(value))
            .unwrap_or(false);
        let value = u8::try_from(value)
            .ok()
            .filter(|_| accepted)
            .ok_or_else(|| ScoringError::InvalidAnswer {
                question: *question,
                value: value.to_string(),
            })?;

        answers[usize::from(*question) - 1] = value;
    }

    let total_score = answers.iter().sum();
    let q10_score = answers[usize::from(SELF_HARM_QUESTION) - 1];

    Ok(ScreeningOutcome {
        answers,
        total_score,
        q10_score,
        category: ResultCategory::classify(total_score, q10_score),
    })
}
