//! Core data model types for studyflow.
//!
//! These are the strictly-typed forms that raw question records are
//! normalized into before any grading happens.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four question kinds a study flow can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
    FillInTheBlank,
}

impl QuestionType {
    /// Display label shown next to a question card.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Múltipla Escolha",
            QuestionType::ShortAnswer => "Resposta Curta",
            QuestionType::TrueFalse => "Verdadeiro/Falso",
            QuestionType::FillInTheBlank => "Preencher Lacuna",
        }
    }

    /// Whether answers are picked from a rendered option list.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "MULTIPLE_CHOICE"),
            QuestionType::ShortAnswer => write!(f, "SHORT_ANSWER"),
            QuestionType::TrueFalse => write!(f, "TRUE_FALSE"),
            QuestionType::FillInTheBlank => write!(f, "FILL_IN_THE_BLANK"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MULTIPLE_CHOICE" => Ok(QuestionType::MultipleChoice),
            "SHORT_ANSWER" => Ok(QuestionType::ShortAnswer),
            "TRUE_FALSE" => Ok(QuestionType::TrueFalse),
            "FILL_IN_THE_BLANK" => Ok(QuestionType::FillInTheBlank),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// An answer value: either a real boolean or free text.
///
/// Absence is modelled as `Option<AnswerValue>` at the use site, so the
/// boolean `false` is never confused with "no answer".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

impl AnswerValue {
    /// Canonical string form: booleans render as `"true"` / `"false"`.
    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Bool(b) => b.to_string(),
            AnswerValue::Text(s) => s.clone(),
        }
    }

    /// Boolean reading used by true/false grading.
    ///
    /// Text counts as `true` only when its lowercase form is `"true"`.
    pub fn as_bool(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Text(s) => s.to_lowercase() == "true",
        }
    }

    /// Returns `true` for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Bool(_) => false,
            AnswerValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(b) => write!(f, "{b}"),
            AnswerValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

/// One quiz item in canonical form.
///
/// Serializes with the same field names the raw records use, so a saved
/// question can be loaded back through ingestion unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Opaque identifier.
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Display text.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Parsed option list. Only meaningful for multiple choice.
    #[serde(rename = "answers")]
    pub options: Vec<String>,
    pub expected_answer: AnswerValue,
    #[serde(default)]
    pub user_answer: Option<AnswerValue>,
    #[serde(default)]
    pub answered: bool,
    /// Only meaningful when `answered` is true.
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Build an unanswered question.
    pub fn new(
        id: impl Into<String>,
        question_type: QuestionType,
        prompt: impl Into<String>,
        expected_answer: impl Into<AnswerValue>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type,
            prompt: prompt.into(),
            options: Vec::new(),
            expected_answer: expected_answer.into(),
            user_answer: None,
            answered: false,
            is_correct: false,
            tags: Vec::new(),
            last_reviewed_at: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The verdict, if one has been recorded.
    pub fn verdict(&self) -> Option<bool> {
        self.answered.then_some(self.is_correct)
    }
}

/// The record a caller transmits to the remote store after grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmission {
    pub id: String,
    pub user_answer: AnswerValue,
    pub correct: bool,
}
