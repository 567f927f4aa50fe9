//! Grading error types.
//!
//! Only the grading boundary returns typed errors. Malformed option data,
//! unknown question types and unparseable timestamps degrade to defaults
//! during ingestion instead of surfacing here.

use thiserror::Error;

/// Reasons a submission is refused before any verdict is computed.
///
/// The question is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// No usable answer was supplied.
    #[error("no answer supplied for question {question_id}")]
    MissingAnswer { question_id: String },

    /// The question already carries a verdict.
    #[error("question {question_id} has already been graded")]
    AlreadyAnswered { question_id: String },
}

impl GradeError {
    /// Returns `true` if the caller should prompt the user again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GradeError::MissingAnswer { .. })
    }

    pub fn question_id(&self) -> &str {
        match self {
            GradeError::MissingAnswer { question_id }
            | GradeError::AlreadyAnswered { question_id } => question_id,
        }
    }
}
